use web_sys::MouseEvent;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SidebarResizerProps {
  pub dragging:     bool,
  pub on_mousedown: Callback<MouseEvent>
}

#[function_component(SidebarResizer)]
pub fn sidebar_resizer(
  props: &SidebarResizerProps
) -> Html {
  let onmousedown =
    props.on_mousedown.clone();

  html! {
      <div
          id="resizer"
          class={classes!("resizer", props.dragging.then_some("dragging"))}
          {onmousedown}
      />
  }
}
