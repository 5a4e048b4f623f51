use calboard_core::Theme;
use web_sys::{
  Event,
  HtmlInputElement
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
  pub theme:     Theme,
  pub on_change: Callback<Theme>
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(
  props: &ThemeToggleProps
) -> Html {
  let onchange = {
    let on_change = props.on_change.clone();
    Callback::from(move |event: Event| {
      let input: HtmlInputElement =
        event.target_unchecked_into();
      on_change.emit(Theme::from_checked(
        input.checked()
      ));
    })
  };

  html! {
      <label class="theme-toggle" title="Dark mode">
          <input
              id="theme-checkbox"
              type="checkbox"
              checked={props.theme.is_dark()}
              {onchange}
          />
          <span class="theme-toggle-label">{ "Dark" }</span>
      </label>
  }
}
