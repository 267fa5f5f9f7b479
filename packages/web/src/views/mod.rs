mod login;
pub use login::Login;

mod track;
pub use track::Track;
