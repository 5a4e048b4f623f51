use calboard_core::Theme;
use calboard_core::prefs::{
  ColorSchemeProbe,
  PreferenceStorage,
  ThemeSurface
};
use yew::UseStateHandle;

const DARK_SCHEME_QUERY: &str =
  "(prefers-color-scheme: dark)";
const THEME_ATTRIBUTE: &str = "data-theme";

/// `window.localStorage`. Private mode or
/// a disabled store reads as empty.
pub struct BrowserStorage;

fn local_storage() -> Option<web_sys::Storage>
{
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

impl PreferenceStorage for BrowserStorage {
  fn get_item(
    &self,
    key: &str
  ) -> Option<String> {
    local_storage().and_then(|storage| {
      storage
        .get_item(key)
        .ok()
        .flatten()
    })
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) {
    let Some(storage) = local_storage() else {
      tracing::warn!(
        key,
        "local storage unavailable; \
         preference not saved"
      );
      return;
    };

    if let Err(error) =
      storage.set_item(key, value)
    {
      tracing::error!(
        key,
        ?error,
        "failed writing preference"
      );
    }
  }
}

pub struct BrowserColorScheme;

impl ColorSchemeProbe for BrowserColorScheme {
  fn prefers_dark(&self) -> bool {
    web_sys::window()
      .and_then(|window| {
        window
          .match_media(DARK_SCHEME_QUERY)
          .ok()
          .flatten()
      })
      .is_some_and(|query| query.matches())
  }
}

pub fn set_document_theme(theme: Theme) {
  let Some(root) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| {
      document.document_element()
    })
  else {
    return;
  };

  if let Err(error) = root.set_attribute(
    THEME_ATTRIBUTE,
    theme.storage_value()
  ) {
    tracing::error!(
      ?error,
      "failed applying theme attribute"
    );
  }
}

/// Toggle state for the theme. The
/// `App` effect on this state is the only
/// writer of the `data-theme` attribute.
pub struct ThemeBinding {
  toggle: UseStateHandle<Theme>
}

impl ThemeBinding {
  pub fn new(
    toggle: UseStateHandle<Theme>
  ) -> Self {
    Self { toggle }
  }
}

impl ThemeSurface for ThemeBinding {
  fn apply_theme(&mut self, theme: Theme) {
    self.toggle.set(theme);
  }
}

/// Body cursor and text selection while
/// the sidebar resizer is held.
pub fn set_body_dragging(dragging: bool) {
  let Some(body) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| document.body())
  else {
    return;
  };

  let style = body.style();
  let (cursor, user_select) = if dragging {
    ("col-resize", "none")
  } else {
    ("", "")
  };
  let _ = style
    .set_property("cursor", cursor);
  let _ = style.set_property(
    "user-select",
    user_select
  );
}
