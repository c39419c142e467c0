pub mod attendance;
pub mod family;
pub mod follow_up;
pub mod group;
pub mod meeting;
pub mod servant;
pub mod setting;
pub mod user;
