pub mod link_service;
pub mod settings_form;

pub use link_service::LinkService;
