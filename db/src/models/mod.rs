pub mod block;
pub mod company;
pub mod district;
pub mod school;
pub mod school_trade;
pub mod state;
pub mod trade;
pub mod trainer;
pub mod trainer_attendance;
pub mod user;

pub use block::Entity as Block;
pub use company::Entity as Company;
pub use district::Entity as District;
pub use school::Entity as School;
pub use school_trade::Entity as SchoolTrade;
pub use state::Entity as State;
pub use trade::Entity as Trade;
pub use trainer::Entity as Trainer;
pub use trainer_attendance::Entity as TrainerAttendance;
pub use user::Entity as User;
