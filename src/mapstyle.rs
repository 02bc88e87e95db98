use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{params, Connection, OpenFlags};

/// A `key=value` tag of the taginfo database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn type_name(&self) -> String {
        format!("{}_{}", self.key, self.value)
    }
}

/// Values that do not describe a kind of object.
const SKIPPED_VALUES: &[&str] = &["yes", "no"];

/// The `limit` most used values of `key`, sorted.
pub fn top_tags(conn: &Connection, key: &str, limit: u32) -> Result<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "select key, value from tags where key = ?1 order by count_all desc limit ?2",
    )?;
    let rows = stmt.query_map(params![key, limit], |row| {
        Ok(Tag {
            key: row.get(0)?,
            value: row.get(1)?,
        })
    })?;

    let mut tags = Vec::new();
    for tag in rows {
        let tag = tag?;
        if SKIPPED_VALUES.contains(&tag.value.as_str()) {
            continue;
        }
        tags.push(tag);
    }
    tags.sort();
    Ok(tags)
}

/// Style rules for every tag, then the whitelist of the new types.
pub fn write_style(tags: &[Tag], out: impl io::Write) -> Result<()> {
    let mut out = BufWriter::new(out);

    for tag in tags {
        let Tag { key, value } = tag;
        writeln!(out, "  TYPE {}", tag.type_name())?;
        writeln!(out, "    = NODE AREA (\"{key}\"==\"{value}\")")?;
        writeln!(out, "      {{Name, NameAlt}}")?;
        writeln!(out, "      ADDRESS POI")?;
        writeln!(out, "      GROUP {key}")?;
        writeln!(out)?;
    }

    writeln!(out)?;
    for tag in tags {
        writeln!(out, "{}", tag.type_name())?;
    }
    writeln!(out)?;

    out.flush()?;
    Ok(())
}

pub fn mapstyle(db: &Path, key: &str, limit: u32) -> Result<()> {
    let conn = Connection::open_with_flags(db, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("opening {}", db.display()))?;
    let tags = top_tags(&conn, key, limit)?;
    info!("{} types for key '{key}'", tags.len());
    write_style(&tags, io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taginfo() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "create table tags (key text, value text, count_all integer);
             insert into tags values ('shop', 'yes', 1000);
             insert into tags values ('shop', 'supermarket', 500);
             insert into tags values ('shop', 'bakery', 400);
             insert into tags values ('shop', 'no', 300);
             insert into tags values ('shop', 'kiosk', 10);
             insert into tags values ('amenity', 'cafe', 900);",
        )
        .unwrap();
        conn
    }

    fn tag(key: &str, value: &str) -> Tag {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }

    #[test]
    fn top_tags() {
        let conn = taginfo();
        assert_eq!(
            super::top_tags(&conn, "shop", 50).unwrap(),
            vec![
                tag("shop", "bakery"),
                tag("shop", "kiosk"),
                tag("shop", "supermarket")
            ]
        );
    }

    #[test]
    fn top_tags_limit() {
        let conn = taginfo();
        // The limit applies before skipping yes/no.
        assert_eq!(
            super::top_tags(&conn, "shop", 3).unwrap(),
            vec![tag("shop", "bakery"), tag("shop", "supermarket")]
        );
        assert!(super::top_tags(&conn, "highway", 50).unwrap().is_empty());
    }

    #[test]
    fn write_style() {
        let mut out = Vec::new();
        super::write_style(&[tag("shop", "bakery"), tag("shop", "kiosk")], &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  TYPE shop_bakery\n\
             \x20   = NODE AREA (\"shop\"==\"bakery\")\n\
             \x20     {Name, NameAlt}\n\
             \x20     ADDRESS POI\n\
             \x20     GROUP shop\n\
             \n\
             \x20 TYPE shop_kiosk\n\
             \x20   = NODE AREA (\"shop\"==\"kiosk\")\n\
             \x20     {Name, NameAlt}\n\
             \x20     ADDRESS POI\n\
             \x20     GROUP shop\n\
             \n\
             \n\
             shop_bakery\n\
             shop_kiosk\n\
             \n"
        );
    }
}
