//! Last-session database operations.
//!
//! Exactly one snapshot is kept (`id = 1`). Saving overwrites it; there is no
//! history.

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{Database, DbError, DbResult};
use crate::models::{SessionSnapshot, Species};

/// Fixed key of the single session row.
const SESSION_ROW_ID: i64 = 1;

impl Database {
    /// Overwrite the last session.
    pub fn save_session(&self, snapshot: &SessionSnapshot) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO last_session (
                id, patient_id, species, weight_kg, dehydration_percent,
                has_vomiting, has_diarrhea, saved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                patient_id = excluded.patient_id,
                species = excluded.species,
                weight_kg = excluded.weight_kg,
                dehydration_percent = excluded.dehydration_percent,
                has_vomiting = excluded.has_vomiting,
                has_diarrhea = excluded.has_diarrhea,
                saved_at = excluded.saved_at
            "#,
            params![
                SESSION_ROW_ID,
                snapshot.patient_id,
                snapshot.species.as_str(),
                snapshot.weight_kg,
                snapshot.dehydration_percent,
                snapshot.has_vomiting,
                snapshot.has_diarrhea,
                snapshot.saved_at,
            ],
        )?;
        info!(species = %snapshot.species, "saved last session");
        Ok(())
    }

    /// Load the last session, if one was saved.
    pub fn load_session(&self) -> DbResult<Option<SessionSnapshot>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT patient_id, species, weight_kg, dehydration_percent,
                       has_vomiting, has_diarrhea, saved_at
                FROM last_session
                WHERE id = ?
                "#,
                [SESSION_ROW_ID],
                |row| {
                    Ok(SessionRow {
                        patient_id: row.get(0)?,
                        species: row.get(1)?,
                        weight_kg: row.get(2)?,
                        dehydration_percent: row.get(3)?,
                        has_vomiting: row.get(4)?,
                        has_diarrhea: row.get(5)?,
                        saved_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// Remove the last session. Returns whether one existed.
    pub fn clear_session(&self) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM last_session WHERE id = ?", [SESSION_ROW_ID])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct SessionRow {
    patient_id: Option<String>,
    species: String,
    weight_kg: Option<f64>,
    dehydration_percent: Option<f64>,
    has_vomiting: bool,
    has_diarrhea: bool,
    saved_at: String,
}

impl TryFrom<SessionRow> for SessionSnapshot {
    type Error = DbError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let species: Species = row
            .species
            .parse()
            .map_err(|e: crate::models::UnknownSpecies| DbError::Constraint(e.to_string()))?;

        Ok(SessionSnapshot {
            patient_id: row.patient_id,
            species,
            weight_kg: row.weight_kg,
            dehydration_percent: row.dehydration_percent,
            has_vomiting: row.has_vomiting,
            has_diarrhea: row.has_diarrhea,
            saved_at: row.saved_at,
        })
    }
}
