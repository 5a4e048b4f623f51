mod important_list;
mod sidebar_resizer;
mod theme_toggle;

pub use important_list::ImportantList;
pub use sidebar_resizer::SidebarResizer;
pub use theme_toggle::ThemeToggle;
