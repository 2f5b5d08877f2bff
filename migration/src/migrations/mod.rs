pub mod m202509200001_create_companies;
pub mod m202509200002_create_users;
pub mod m202509200003_create_states;
pub mod m202509200004_create_districts;
pub mod m202509200005_create_blocks;
pub mod m202509200006_create_trades;
pub mod m202509200007_create_schools;
pub mod m202509200008_create_school_trades;
pub mod m202509200009_create_trainers;
pub mod m202509200010_create_trainer_attendance;
