use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509200010_create_trainer_attendance"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("trainer_attendance"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("trainer_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("date")).date().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("attendance_status"),
                                vec![
                                    Alias::new("present"),
                                    Alias::new("absent"),
                                    Alias::new("checkout"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("check_in_at")).timestamp())
                    .col(ColumnDef::new(Alias::new("check_out_at")).timestamp())
                    .col(ColumnDef::new(Alias::new("total_hour")).double().not_null().default(0.0))
                    .col(ColumnDef::new(Alias::new("latitude")).double())
                    .col(ColumnDef::new(Alias::new("longitude")).double())
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .primary_key(
                        Index::create()
                            .col(Alias::new("trainer_id"))
                            .col(Alias::new("date")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("trainer_attendance"), Alias::new("trainer_id"))
                            .to(Alias::new("trainers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("trainer_attendance")).to_owned())
            .await
    }
}
