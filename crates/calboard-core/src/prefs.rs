use std::collections::BTreeMap;

pub const THEME_STORAGE_KEY: &str =
  "theme";
pub const SIDEBAR_WIDTH_STORAGE_KEY: &str =
  "sidebarWidth";

pub const SIDEBAR_MIN_WIDTH_PX: u32 = 150;
pub const SIDEBAR_MAX_WIDTH_PX: u32 = 600;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum Theme {
  #[default]
  Light,
  Dark
}

impl Theme {
  pub fn storage_value(
    self
  ) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim() {
      | "light" => Some(Self::Light),
      | "dark" => Some(Self::Dark),
      | _ => None
    }
  }

  /// Theme selected by a checkbox-style
  /// toggle, where checked means dark.
  pub fn from_checked(
    checked: bool
  ) -> Self {
    if checked {
      Self::Dark
    } else {
      Self::Light
    }
  }

  pub fn is_dark(self) -> bool {
    self == Self::Dark
  }
}

/// Durable key/value storage. A missing
/// key is a normal state, not an error.
pub trait PreferenceStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Option<String>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  );
}

/// OS-level color scheme signal.
pub trait ColorSchemeProbe {
  fn prefers_dark(&self) -> bool;
}

/// Whatever makes a theme visible: the
/// document attribute read by styling and
/// the toggle control.
pub trait ThemeSurface {
  fn apply_theme(&mut self, theme: Theme);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  items: BTreeMap<String, String>
}

impl PreferenceStorage for MemoryStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Option<String> {
    self.items.get(key).cloned()
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) {
    self
      .items
      .insert(key.to_string(), value.to_string());
  }
}

/// Sidebar width in pixels, always within
/// [`SIDEBAR_MIN_WIDTH_PX`,
/// `SIDEBAR_MAX_WIDTH_PX`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
)]
pub struct SidebarWidth(u32);

impl SidebarWidth {
  pub fn clamped(px: i64) -> Self {
    let px = px.clamp(
      i64::from(SIDEBAR_MIN_WIDTH_PX),
      i64::from(SIDEBAR_MAX_WIDTH_PX)
    );
    Self(u32::try_from(px).unwrap_or(
      SIDEBAR_MIN_WIDTH_PX
    ))
  }

  pub fn px(self) -> u32 {
    self.0
  }

  pub fn css_value(self) -> String {
    format!("{}px", self.0)
  }

  fn parse_stored(
    raw: &str
  ) -> Option<Self> {
    raw
      .trim()
      .parse::<i64>()
      .ok()
      .map(Self::clamped)
  }
}

/// An in-progress resizer drag. The
/// sidebar sits right of the handle, so
/// moving the pointer left widens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarDrag {
  start_x:     i32,
  start_width: i64
}

impl SidebarDrag {
  pub fn begin(
    start_x: i32,
    start_width_px: i64
  ) -> Self {
    Self {
      start_x,
      start_width: start_width_px
    }
  }

  pub fn width_at(
    &self,
    client_x: i32
  ) -> SidebarWidth {
    let delta = i64::from(self.start_x)
      - i64::from(client_x);
    SidebarWidth::clamped(
      self.start_width + delta
    )
  }
}

/// Reads and writes the two display
/// preferences. The keys are independent
/// so writes never need coordination.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore<S> {
  storage: S
}

impl<S: PreferenceStorage>
  PreferenceStore<S>
{
  pub fn new(storage: S) -> Self {
    Self { storage }
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  pub fn load_theme(
    &self,
    probe: &dyn ColorSchemeProbe
  ) -> Theme {
    if let Some(raw) =
      self.storage.get_item(THEME_STORAGE_KEY)
    {
      match Theme::parse(&raw) {
        | Some(theme) => return theme,
        | None => {
          tracing::warn!(
            stored = %raw,
            "ignoring unknown stored theme"
          );
        }
      }
    }

    if probe.prefers_dark() {
      Theme::Dark
    } else {
      Theme::Light
    }
  }

  /// Persists `theme`, then applies it.
  pub fn set_theme(
    &mut self,
    theme: Theme,
    surface: &mut dyn ThemeSurface
  ) {
    self.storage.set_item(
      THEME_STORAGE_KEY,
      theme.storage_value()
    );
    tracing::debug!(
      theme = theme.storage_value(),
      "saved theme preference"
    );
    surface.apply_theme(theme);
  }

  pub fn load_sidebar_width(
    &self
  ) -> Option<SidebarWidth> {
    let raw = self
      .storage
      .get_item(SIDEBAR_WIDTH_STORAGE_KEY)?;
    let width =
      SidebarWidth::parse_stored(&raw);
    if width.is_none() {
      tracing::warn!(
        stored = %raw,
        "ignoring malformed stored \
         sidebar width"
      );
    }
    width
  }

  pub fn set_sidebar_width(
    &mut self,
    px: i64
  ) -> SidebarWidth {
    let width = SidebarWidth::clamped(px);
    self.storage.set_item(
      SIDEBAR_WIDTH_STORAGE_KEY,
      &width.px().to_string()
    );
    tracing::debug!(
      requested = px,
      saved = width.px(),
      "saved sidebar width"
    );
    width
  }
}
