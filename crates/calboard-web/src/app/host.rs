use calboard_core::{
  ViewHost,
  WidgetError,
  WidgetOptions
};
use web_sys::Element;
use yew::{
  NodeRef,
  UseStateHandle
};

use super::widget::FullCalendarWidget;

/// The page surface the reconciler drives:
/// the calendar container, the important
/// list state, and `window.location`.
pub struct PageHost {
  container:  NodeRef,
  importants: UseStateHandle<Vec<String>>
}

impl PageHost {
  pub fn new(
    container: NodeRef,
    importants: UseStateHandle<Vec<String>>
  ) -> Self {
    Self {
      container,
      importants
    }
  }
}

impl ViewHost for PageHost {
  type Widget = FullCalendarWidget;

  fn create_widget(
    &mut self,
    options: &WidgetOptions
  ) -> Result<FullCalendarWidget, WidgetError>
  {
    let Some(element) =
      self.container.cast::<Element>()
    else {
      return Err(WidgetError(
        "calendar container is not \
         mounted"
          .to_string()
      ));
    };

    FullCalendarWidget::mount(
      &element, options
    )
  }

  fn replace_importants(
    &mut self,
    lines: Vec<String>
  ) {
    self.importants.set(lines);
  }

  fn redirect(&mut self, path: &str) {
    let Some(window) = web_sys::window()
    else {
      tracing::error!(
        path,
        "no window to redirect"
      );
      return;
    };

    if let Err(error) =
      window.location().set_href(path)
    {
      tracing::error!(
        path,
        ?error,
        "redirect failed"
      );
    }
  }
}
