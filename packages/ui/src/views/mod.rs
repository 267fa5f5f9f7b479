mod login;
pub use login::LoginView;

mod tracker;
pub use tracker::TrackerView;
