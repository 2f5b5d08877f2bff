use crate::seed::Seeder;
use db::models::user::{self, UserRole};
use db::models::{block, company, district, state, trade};
use db::registration::{
    RegistrationError, SchoolRegistration, TradeRegistration, TrainerRegistration, register_school,
};
use fake::{Fake, faker::name::en::Name};
use hierarchy::Location;
use sea_orm::{DatabaseConnection, DbErr};

struct Region {
    state: &'static str,
    districts: &'static [(&'static str, &'static [(&'static str, &'static str)])],
    center: (f64, f64),
}

const REGIONS: &[Region] = &[
    Region {
        state: "Uttar Pradesh",
        districts: &[
            ("Lucknow", &[("Aliganj", "226024"), ("Chinhat", "226028")]),
            ("Kanpur Nagar", &[("Kalyanpur", "208017")]),
        ],
        center: (26.85, 80.95),
    },
    Region {
        state: "Bihar",
        districts: &[("Patna", &[("Danapur", "801503")]), ("Gaya", &[])],
        center: (25.59, 85.14),
    },
    Region {
        state: "Rajasthan",
        districts: &[("Jaipur", &[("Sanganer", "302029")])],
        center: (26.91, 75.79),
    },
];

const COMPANIES: &[&str] = &["Skillbridge Foundation", "Kaushal Vikas Trust", "Udaan Learning"];
const TRADES: &[(&str, &str)] = &[
    ("Electrician", "Electrical"),
    ("Plumber", "Construction"),
    ("Beauty & Wellness", "Services"),
    ("IT/ITeS", "Technology"),
];

/// Demo tenants with a populated hierarchy, schools and trainer logins.
pub struct CompanySeeder;

fn jitter((lat, lng): (f64, f64)) -> Option<Location> {
    Location::new(lat + fastrand::f64() * 0.2 - 0.1, lng + fastrand::f64() * 0.2 - 0.1).ok()
}

async fn seed_company(db: &DatabaseConnection, n: usize, name: &str) -> Result<(), DbErr> {
    if company::Model::find_by_name(db, name).await?.is_some() {
        return Ok(());
    }
    let slug: String = name
        .split_whitespace()
        .next()
        .unwrap_or("company")
        .to_lowercase();
    let c = company::Model::create(db, name).await?;
    user::Model::create(
        db,
        &format!("{name} Admin"),
        &format!("admin@{slug}.test"),
        "password123",
        UserRole::CompanyAdmin,
        Some(c.id),
    )
    .await?;

    let mut trade_ids = Vec::new();
    for (trade_name, category) in TRADES {
        trade_ids.push(trade::Model::create(db, c.id, trade_name, category).await?.id);
    }

    // Each tenant works in a different subset of regions.
    let mut school_no = 0;
    for region in REGIONS.iter().skip(n % 2).take(2) {
        let st = state::Model::create(db, c.id, region.state).await?;
        for (district_name, blocks) in region.districts {
            let di = district::Model::create(db, c.id, st.id, district_name).await?;
            for (block_name, pincode) in blocks.iter() {
                let bl = block::Model::create(db, c.id, di.id, block_name, pincode).await?;
                for _ in 0..2 {
                    school_no += 1;
                    let trades = trade_ids
                        .iter()
                        .take(1 + fastrand::usize(..trade_ids.len()))
                        .enumerate()
                        .map(|(k, &trade_id)| TradeRegistration {
                            trade_id,
                            trainers: vec![TrainerRegistration {
                                full_name: Name().fake(),
                                email: format!("trainer{school_no}-{k}@{slug}.test"),
                                phone: format!("98{:08}", fastrand::u32(..100_000_000)),
                                password: "password123".into(),
                                location: jitter(region.center),
                            }],
                        })
                        .collect();

                    let reg = SchoolRegistration {
                        uid: format!("{}-{school_no:04}", slug.to_uppercase()),
                        name: format!("Govt. School {block_name} {school_no}"),
                        block_id: bl.id,
                        address: format!("{block_name}, {district_name}"),
                        location: jitter(region.center),
                        trades,
                    };
                    register_school(db, c.id, reg).await.map_err(|e| match e {
                        RegistrationError::Db(db_err) => db_err,
                        other => DbErr::Custom(other.to_string()),
                    })?;
                }
            }
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl Seeder for CompanySeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for (n, name) in COMPANIES.iter().enumerate() {
            seed_company(db, n, name).await?;
        }
        Ok(())
    }
}
