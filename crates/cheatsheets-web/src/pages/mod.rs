mod doc;
mod not_found;

pub use doc::DocPage;
pub use not_found::NotFound;
