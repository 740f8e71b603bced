mod copy_buttons;
mod doc_footer;
mod external_link;
mod nav_bar;
mod outline;
mod search_box;
mod sidebar;
mod site_footer;

pub use copy_buttons::{ContentReady, use_copy_buttons};
pub use doc_footer::DocFooter;
pub use external_link::ExternalLink;
pub use nav_bar::NavBar;
pub use outline::Outline;
pub use search_box::SearchBox;
pub use sidebar::Sidebar;
pub use site_footer::SiteFooter;
