pub mod controller;
pub mod grant;
pub mod presenter;
pub mod state;
pub mod timer;
