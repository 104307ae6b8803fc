use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(SkillTypes::Table)
                    .col(pk_id_col(manager, SkillTypes::Id))
                    .col(uuid_col(SkillTypes::Uuid))
                    .col(ColumnDef::new(SkillTypes::Name).string().not_null())
                    .col(
                        ColumnDef::new(SkillTypes::Color)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("#64748b")),
                    )
                    .col(timestamp_col(SkillTypes::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_skill_types_uuid")
                    .table(SkillTypes::Table)
                    .col(SkillTypes::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Skills::Table)
                    .col(pk_id_col(manager, Skills::Id))
                    .col(uuid_col(Skills::Uuid))
                    .col(ColumnDef::new(Skills::Name).string().not_null())
                    .col(fk_id_col(manager, Skills::SkillTypeId))
                    .col(timestamp_col(Skills::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_skills_skill_type_id")
                            .from(Skills::Table, Skills::SkillTypeId)
                            .to(SkillTypes::Table, SkillTypes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_skills_uuid")
                    .table(Skills::Table)
                    .col(Skills::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_skills_skill_type_id")
                    .table(Skills::Table)
                    .col(Skills::SkillTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Staff::Table)
                    .col(pk_id_col(manager, Staff::Id))
                    .col(uuid_col(Staff::Uuid))
                    .col(ColumnDef::new(Staff::Name).string().not_null())
                    .col(ColumnDef::new(Staff::Email).string().not_null())
                    .col(fk_id_col(manager, Staff::SkillId))
                    .col(
                        ColumnDef::new(Staff::IsLeader)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(Staff::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_skill_id")
                            .from(Staff::Table, Staff::SkillId)
                            .to(Skills::Table, Skills::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_staff_uuid")
                    .table(Staff::Table)
                    .col(Staff::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_staff_skill_id")
                    .table(Staff::Table)
                    .col(Staff::SkillId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(Events::Table)
                    .col(pk_id_col(manager, Events::Id))
                    .col(uuid_col(Events::Uuid))
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Date).date().not_null())
                    .col(timestamp_col(Events::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_events_uuid")
                    .table(Events::Table)
                    .col(Events::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_events_date")
                    .table(Events::Table)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(SurveyRequests::Table)
                    .col(pk_id_col(manager, SurveyRequests::Id))
                    .col(uuid_col(SurveyRequests::Uuid))
                    .col(ColumnDef::new(SurveyRequests::Token).string().not_null())
                    .col(fk_id_col(manager, SurveyRequests::StaffId))
                    .col(
                        ColumnDef::new(SurveyRequests::SentAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyRequests::CompletedAt).timestamp())
                    .col(timestamp_col(SurveyRequests::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_requests_staff_id")
                            .from(SurveyRequests::Table, SurveyRequests::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_survey_requests_uuid")
                    .table(SurveyRequests::Table)
                    .col(SurveyRequests::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_survey_requests_token")
                    .table(SurveyRequests::Table)
                    .col(SurveyRequests::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_survey_requests_staff_id")
                    .table(SurveyRequests::Table)
                    .col(SurveyRequests::StaffId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(SurveyRequestEvents::Table)
                    .col(pk_id_col(manager, SurveyRequestEvents::Id))
                    .col(uuid_col(SurveyRequestEvents::Uuid))
                    .col(fk_id_col(manager, SurveyRequestEvents::SurveyRequestId))
                    .col(fk_id_col(manager, SurveyRequestEvents::EventId))
                    .col(timestamp_col(SurveyRequestEvents::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_request_events_survey_request_id")
                            .from(
                                SurveyRequestEvents::Table,
                                SurveyRequestEvents::SurveyRequestId,
                            )
                            .to(SurveyRequests::Table, SurveyRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_request_events_event_id")
                            .from(SurveyRequestEvents::Table, SurveyRequestEvents::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_survey_request_events_uuid")
                    .table(SurveyRequestEvents::Table)
                    .col(SurveyRequestEvents::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_survey_request_events_pair")
                    .table(SurveyRequestEvents::Table)
                    .col(SurveyRequestEvents::SurveyRequestId)
                    .col(SurveyRequestEvents::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(StaffAvailability::Table)
                    .col(pk_id_col(manager, StaffAvailability::Id))
                    .col(uuid_col(StaffAvailability::Uuid))
                    .col(fk_id_col(manager, StaffAvailability::SurveyRequestId))
                    .col(fk_id_col(manager, StaffAvailability::EventId))
                    .col(
                        ColumnDef::new(StaffAvailability::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(Expr::val(false)),
                    )
                    .col(timestamp_col(StaffAvailability::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_availability_survey_request_id")
                            .from(
                                StaffAvailability::Table,
                                StaffAvailability::SurveyRequestId,
                            )
                            .to(SurveyRequests::Table, SurveyRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_availability_event_id")
                            .from(StaffAvailability::Table, StaffAvailability::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_staff_availability_uuid")
                    .table(StaffAvailability::Table)
                    .col(StaffAvailability::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_staff_availability_pair")
                    .table(StaffAvailability::Table)
                    .col(StaffAvailability::SurveyRequestId)
                    .col(StaffAvailability::EventId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create().if_not_exists()
                    .table(EventAssignments::Table)
                    .col(pk_id_col(manager, EventAssignments::Id))
                    .col(uuid_col(EventAssignments::Uuid))
                    .col(fk_id_col(manager, EventAssignments::EventId))
                    .col(fk_id_col(manager, EventAssignments::StaffId))
                    .col(
                        ColumnDef::new(EventAssignments::AssignedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(uuid_nullable_col(EventAssignments::AssignedBy))
                    .col(timestamp_col(EventAssignments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_assignments_event_id")
                            .from(EventAssignments::Table, EventAssignments::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_assignments_staff_id")
                            .from(EventAssignments::Table, EventAssignments::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_event_assignments_uuid")
                    .table(EventAssignments::Table)
                    .col(EventAssignments::Uuid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create().if_not_exists()
                    .name("idx_event_assignments_pair")
                    .table(EventAssignments::Table)
                    .col(EventAssignments::EventId)
                    .col(EventAssignments::StaffId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StaffAvailability::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyRequestEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Skills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SkillTypes::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().auto_increment().primary_key().to_owned()
}

fn fk_id_col<T: Iden>(manager: &SchemaManager, col: T) -> ColumnDef {
    let mut col = ColumnDef::new(col);
    match manager.get_database_backend() {
        DatabaseBackend::Sqlite => {
            col.integer();
        }
        _ => {
            col.big_integer();
        }
    }
    col.not_null().to_owned()
}

fn uuid_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().not_null().to_owned()
}

fn uuid_nullable_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).uuid().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum SkillTypes {
    Table,
    Id,
    Uuid,
    Name,
    Color,
    CreatedAt,
}

#[derive(Iden)]
enum Skills {
    Table,
    Id,
    Uuid,
    Name,
    SkillTypeId,
    CreatedAt,
}

#[derive(Iden)]
enum Staff {
    Table,
    Id,
    Uuid,
    Name,
    Email,
    SkillId,
    IsLeader,
    CreatedAt,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    Uuid,
    Title,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum SurveyRequests {
    Table,
    Id,
    Uuid,
    Token,
    StaffId,
    SentAt,
    CompletedAt,
    CreatedAt,
}

#[derive(Iden)]
enum SurveyRequestEvents {
    Table,
    Id,
    Uuid,
    SurveyRequestId,
    EventId,
    CreatedAt,
}

#[derive(Iden)]
enum StaffAvailability {
    Table,
    Id,
    Uuid,
    SurveyRequestId,
    EventId,
    IsAvailable,
    CreatedAt,
}

#[derive(Iden)]
enum EventAssignments {
    Table,
    Id,
    Uuid,
    EventId,
    StaffId,
    AssignedAt,
    AssignedBy,
    CreatedAt,
}
