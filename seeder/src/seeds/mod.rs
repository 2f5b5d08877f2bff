pub mod attendance;
pub mod company;
pub mod super_admin;
