mod auth_test;
mod companyadmins_test;
mod dashboard_test;
mod health_test;
mod superadmins_test;
mod trainers_test;
