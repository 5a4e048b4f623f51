use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ImportantListProps {
  pub lines: Vec<String>
}

#[function_component(ImportantList)]
pub fn important_list(
  props: &ImportantListProps
) -> Html {
  html! {
      <div id="important-list" class="important-list">
          { for props.lines.iter().map(|line| html! {
              <div class="important-event">{ line.clone() }</div>
          }) }
      </div>
  }
}
