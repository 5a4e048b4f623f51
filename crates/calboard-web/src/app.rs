mod host;
mod storage;
mod widget;

use std::cell::RefCell;
use std::rc::Rc;

use calboard_core::{
  ClientConfig,
  PollScheduler,
  PreferenceStore,
  Reconciler,
  SidebarDrag,
  SidebarWidth,
  SyncSession,
  Theme,
  poll_tick
};
use chrono::Local;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{
  HtmlElement,
  MouseEvent
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_mut_ref,
  use_node_ref,
  use_state
};

use crate::api::HttpEventSource;
use crate::components::{
  ImportantList,
  SidebarResizer,
  ThemeToggle
};
use host::PageHost;
use storage::{
  BrowserColorScheme,
  BrowserStorage,
  ThemeBinding,
  set_body_dragging,
  set_document_theme
};
use widget::BrowserLocaleFormat;

const CLIENT_CONFIG_TOML: &str =
  include_str!("../assets/calboard.toml");

#[derive(Clone, Copy)]
struct ActiveResize {
  drag:    SidebarDrag,
  current: SidebarWidth
}

fn preferences()
-> PreferenceStore<BrowserStorage> {
  PreferenceStore::new(BrowserStorage)
}

#[function_component(App)]
pub fn app() -> Html {
  let config = use_memo((), |_| {
    ClientConfig::load_or_default(
      CLIENT_CONFIG_TOML
    )
  });
  let theme = use_state(|| {
    preferences()
      .load_theme(&BrowserColorScheme)
  });
  let sidebar_width = use_state(|| {
    preferences().load_sidebar_width()
  });
  let resizing = use_state(|| false);
  let active_resize =
    use_mut_ref(|| None::<ActiveResize>);
  let importants =
    use_state(Vec::<String>::new);
  let calendar_ref = use_node_ref();
  let sidebar_ref = use_node_ref();

  use_effect_with(*theme, |theme| {
    set_document_theme(*theme);
  });

  {
    let config = Rc::clone(&config);
    let calendar_ref = calendar_ref.clone();
    let importants = importants.clone();
    use_effect_with((), move |_| {
      let session =
        Rc::new(RefCell::new(SyncSession::new(
          PollScheduler::new(
            config.poll_interval()
          ),
          Reconciler::new(
            PageHost::new(
              calendar_ref,
              importants
            ),
            &config,
            Box::new(BrowserLocaleFormat)
          )
        )));
      let source = Rc::new(
        HttpEventSource::new(
          config.events_endpoint.clone()
        )
      );
      let period_ms = session
        .borrow()
        .scheduler
        .period_millis();

      let run_tick = move || {
        let session = Rc::clone(&session);
        let source = Rc::clone(&source);
        wasm_bindgen_futures::spawn_local(
          async move {
            poll_tick(
              source.as_ref(),
              session.as_ref(),
              || Local::now().date_naive()
            )
            .await;
          }
        );
      };

      run_tick();
      let interval =
        Interval::new(period_ms, run_tick);
      tracing::info!(
        period_ms,
        "event polling started"
      );

      move || drop(interval)
    });
  }

  {
    let active_resize = active_resize.clone();
    let sidebar_width = sidebar_width.clone();
    let resizing = resizing.clone();
    use_effect_with((), move |_| {
      let listeners = web_sys::window()
        .and_then(|window| window.document())
        .map(|document| {
          let on_move = {
            let active_resize =
              active_resize.clone();
            let sidebar_width =
              sidebar_width.clone();
            EventListener::new(
              &document,
              "mousemove",
              move |event: &web_sys::Event| {
                let Some(event) =
                  event.dyn_ref::<MouseEvent>()
                else {
                  return;
                };
                let mut active =
                  active_resize.borrow_mut();
                let Some(resize) =
                  active.as_mut()
                else {
                  return;
                };
                resize.current = resize
                  .drag
                  .width_at(event.client_x());
                sidebar_width
                  .set(Some(resize.current));
              }
            )
          };

          let on_up = EventListener::new(
            &document,
            "mouseup",
            move |_: &web_sys::Event| {
              let Some(resize) =
                active_resize.borrow_mut().take()
              else {
                return;
              };
              let saved = preferences()
                .set_sidebar_width(i64::from(
                  resize.current.px()
                ));
              sidebar_width.set(Some(saved));
              resizing.set(false);
              set_body_dragging(false);
            }
          );

          (on_move, on_up)
        });

      move || drop(listeners)
    });
  }

  let on_theme_change = {
    let theme = theme.clone();
    Callback::from(move |next: Theme| {
      preferences().set_theme(
        next,
        &mut ThemeBinding::new(theme.clone())
      );
    })
  };

  let on_resizer_mousedown = {
    let active_resize = active_resize.clone();
    let resizing = resizing.clone();
    let sidebar_ref = sidebar_ref.clone();
    Callback::from(
      move |event: MouseEvent| {
        event.prevent_default();
        let start_width = sidebar_ref
          .cast::<HtmlElement>()
          .map(|sidebar| sidebar.offset_width())
          .unwrap_or_default();
        *active_resize.borrow_mut() =
          Some(ActiveResize {
            drag:    SidebarDrag::begin(
              event.client_x(),
              i64::from(start_width)
            ),
            current: SidebarWidth::clamped(
              i64::from(start_width)
            )
          });
        resizing.set(true);
        set_body_dragging(true);
      }
    )
  };

  let sidebar_style = (*sidebar_width)
    .map(|width| {
      format!("width: {};", width.css_value())
    });

  html! {
      <div class="layout">
          <header class="toolbar">
              <ThemeToggle theme={*theme} on_change={on_theme_change} />
          </header>
          <main class="content">
              <div id="calendar" class="calendar" ref={calendar_ref} />
              <SidebarResizer dragging={*resizing} on_mousedown={on_resizer_mousedown} />
              <aside
                  id="important-events"
                  class="important-events"
                  ref={sidebar_ref}
                  style={sidebar_style}
              >
                  <h2>{ "Important" }</h2>
                  <ImportantList lines={(*importants).clone()} />
              </aside>
          </main>
      </div>
  }
}
