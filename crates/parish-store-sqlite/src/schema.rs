//! SQL schema for the parish registry.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS members (
    member_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name        TEXT NOT NULL,
    middle_name       TEXT,
    last_name         TEXT NOT NULL,
    date_of_birth     TEXT,
    gender            TEXT,            -- 'male' | 'female'
    tribe             TEXT,
    clan              TEXT,
    phone             TEXT,
    email             TEXT,
    residence         TEXT,
    membership_status TEXT NOT NULL DEFAULT 'active',
    matrimony_status  TEXT NOT NULL DEFAULT 'single',
    -- summary copies; filled only when empty
    baptism_date      TEXT,
    confirmation_date TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sacraments (
    sacrament_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id            INTEGER REFERENCES members(member_id),
    sacrament_type       TEXT NOT NULL,
    sacrament_date       TEXT NOT NULL,
    location             TEXT,
    celebrant            TEXT,
    witness_1            TEXT,
    witness_2            TEXT,
    certificate_number   TEXT,
    book_number          TEXT,
    page_number          TEXT,
    notes                TEXT,
    -- 'baptism_record' | 'marriage_record'; no FK, the target table varies
    detailed_record_type TEXT,
    detailed_record_id   INTEGER,
    recorded_by          INTEGER,
    created_at           TEXT NOT NULL,
    CHECK ((detailed_record_type IS NULL) = (detailed_record_id IS NULL))
);

CREATE TABLE IF NOT EXISTS baptism_records (
    record_id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    record_number                TEXT NOT NULL UNIQUE,
    member_id                    INTEGER NOT NULL REFERENCES members(member_id),
    father_name                  TEXT NOT NULL,
    mother_name                  TEXT NOT NULL,
    tribe                        TEXT NOT NULL,
    birth_village                TEXT NOT NULL,
    county                       TEXT NOT NULL,
    birth_date                   TEXT NOT NULL,
    residence                    TEXT NOT NULL,
    baptism_location             TEXT NOT NULL,
    baptism_date                 TEXT NOT NULL,
    baptized_by                  TEXT NOT NULL,
    sponsor                      TEXT NOT NULL,
    certificate_number           TEXT,
    book_number                  TEXT,
    page_number                  TEXT,
    notes                        TEXT,
    eucharist_location           TEXT,
    eucharist_date               TEXT,
    confirmation_location        TEXT,
    confirmation_date            TEXT,
    confirmation_register_number TEXT,
    confirmation_number          TEXT,
    marriage_spouse              TEXT,
    marriage_location            TEXT,
    marriage_date                TEXT,
    baptism_sacrament_id         INTEGER NOT NULL REFERENCES sacraments(sacrament_id),
    eucharist_sacrament_id       INTEGER REFERENCES sacraments(sacrament_id) ON DELETE SET NULL,
    confirmation_sacrament_id    INTEGER REFERENCES sacraments(sacrament_id) ON DELETE SET NULL,
    marriage_sacrament_id        INTEGER REFERENCES sacraments(sacrament_id) ON DELETE SET NULL,
    recorded_by                  INTEGER,
    created_at                   TEXT NOT NULL,
    updated_at                   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS marriage_records (
    record_id                         INTEGER PRIMARY KEY AUTOINCREMENT,
    record_number                     TEXT NOT NULL UNIQUE,
    husband_id                        INTEGER REFERENCES members(member_id),
    wife_id                           INTEGER REFERENCES members(member_id),
    husband_name                      TEXT,
    wife_name                         TEXT,
    marriage_date                     TEXT NOT NULL,
    marriage_church                   TEXT NOT NULL,
    district                          TEXT,
    province                          TEXT,
    presence_of                       TEXT NOT NULL,
    delegated_by                      TEXT,
    delegation_date                   TEXT,
    husband_father_name               TEXT,
    husband_mother_name               TEXT,
    husband_tribe                     TEXT,
    husband_clan                      TEXT,
    husband_birth_place               TEXT,
    husband_domicile                  TEXT,
    husband_baptized_at               TEXT,
    husband_baptism_date              TEXT,
    husband_widower_of                TEXT,
    husband_parent_consent            TEXT,
    wife_father_name                  TEXT,
    wife_mother_name                  TEXT,
    wife_tribe                        TEXT,
    wife_clan                         TEXT,
    wife_birth_place                  TEXT,
    wife_domicile                     TEXT,
    wife_baptized_at                  TEXT,
    wife_baptism_date                 TEXT,
    wife_widow_of                     TEXT,
    wife_parent_consent               TEXT,
    banns_number                      TEXT,
    banns_church                      TEXT,
    banns_dates                       TEXT,
    dispensation_from                 TEXT,
    dispensation_given_by             TEXT,
    dispensation_impediment           TEXT,
    dispensation_date                 TEXT,
    male_witness_full_name            TEXT,
    male_witness_father               TEXT,
    male_witness_clan                 TEXT,
    female_witness_full_name          TEXT,
    female_witness_father             TEXT,
    female_witness_clan               TEXT,
    civil_marriage_certificate_number TEXT,
    other_documents                   TEXT,
    notes                             TEXT,
    sacrament_id                      INTEGER REFERENCES sacraments(sacrament_id) ON DELETE SET NULL,
    parish_priest_id                  INTEGER,
    created_at                        TEXT NOT NULL,
    updated_at                        TEXT NOT NULL,
    CHECK (husband_name IS NOT NULL OR wife_name IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS sacraments_member_idx   ON sacraments(member_id);
CREATE INDEX IF NOT EXISTS sacraments_type_idx     ON sacraments(sacrament_type);
CREATE INDEX IF NOT EXISTS baptism_member_idx      ON baptism_records(member_id);
CREATE INDEX IF NOT EXISTS marriage_husband_idx    ON marriage_records(husband_id);
CREATE INDEX IF NOT EXISTS marriage_wife_idx       ON marriage_records(wife_id);
CREATE INDEX IF NOT EXISTS members_last_name_idx   ON members(last_name);

PRAGMA user_version = 1;
";
