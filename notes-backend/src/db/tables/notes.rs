//! Notes table operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::super::{Database, DbResult};
use crate::models::note::{encode_tags, format_timestamp, Note, TagsInput};
use crate::validators::NormalizedNote;

const NOTE_COLUMNS: &str = "id, title, content, tags, created_at, updated_at";

impl Database {
    /// Insert a new note. Tags are canonicalized by the codec before storage.
    pub fn create_note(
        &self,
        title: &str,
        content: Option<&str>,
        tags: Option<&TagsInput>,
    ) -> DbResult<Note> {
        let conn = self.conn()?;
        let now = Utc::now();
        let now_str = format_timestamp(&now);
        let encoded_tags = encode_tags(tags);

        conn.execute(
            "INSERT INTO notes (title, content, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, content, encoded_tags, &now_str],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title: title.to_string(),
            content: content.map(|s| s.to_string()),
            tags: encoded_tags,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch a note by id.
    pub fn get_note(&self, id: i64) -> DbResult<Option<Note>> {
        let conn = self.conn()?;
        Ok(Self::fetch_note(&conn, id)?)
    }

    /// List notes, newest first, with an optional case-insensitive substring
    /// filter over title and content. Returns the page and the filtered total.
    pub fn list_notes(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> DbResult<(Vec<Note>, i64)> {
        let conn = self.conn()?;

        let term = search.map(str::trim).filter(|s| !s.is_empty());

        if let Some(term) = term {
            let pattern = format!("%{}%", term.to_lowercase());

            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes
                 WHERE LOWER(title) LIKE ?1 OR LOWER(COALESCE(content, '')) LIKE ?1",
                [&pattern],
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE LOWER(title) LIKE ?1 OR LOWER(COALESCE(content, '')) LIKE ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
            ))?;
            let notes = stmt
                .query_map(params![pattern, limit, offset], |row| {
                    Self::row_to_note(row)
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok((notes, total))
        } else {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
            ))?;
            let notes = stmt
                .query_map(params![limit, offset], |row| Self::row_to_note(row))?
                .filter_map(|r| r.ok())
                .collect();

            Ok((notes, total))
        }
    }

    /// Apply a partial update. Only fields present in `fields` are touched;
    /// `id` and `created_at` never change. Returns None if the note is absent.
    pub fn update_note(&self, id: i64, fields: &NormalizedNote) -> DbResult<Option<Note>> {
        let conn = self.conn()?;

        let Some(mut note) = Self::fetch_note(&conn, id)? else {
            return Ok(None);
        };

        if let Some(title) = &fields.title {
            note.title = title.clone();
        }
        if let Some(content) = &fields.content {
            note.content = Some(content.clone());
        }
        if let Some(tags) = &fields.tags {
            note.tags = encode_tags(Some(tags));
        }
        note.updated_at = Utc::now();

        conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, tags = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                note.title,
                note.content,
                note.tags,
                format_timestamp(&note.updated_at),
                id
            ],
        )?;

        Ok(Some(note))
    }

    /// Delete a note. Returns whether a row was removed.
    pub fn delete_note(&self, id: i64) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    fn fetch_note(conn: &Connection, id: i64) -> rusqlite::Result<Option<Note>> {
        conn.query_row(
            &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
            [id],
            |row| Self::row_to_note(row),
        )
        .optional()
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let created_at_str: String = row.get(4)?;
        let updated_at_str: String = row.get(5)?;

        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            tags: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
