//! The catalog store: four record kinds in one SQLite file.

use crate::error::{StoreError, StoreResult};
use platefolio_model::visibility::{CollectionFilter, PlateFilter};
use platefolio_model::{now_millis, Collection, Membership, Plate, Profile};
use platefolio_types::{CollectionId, OwnerId, PlateId};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// SQLite-backed store for profiles, plates, collections, and memberships.
///
/// Constructed once and passed by handle to whoever needs it; there is no
/// global instance. Uniqueness rules live in the schema:
///
/// - `profiles.handle` is globally unique, case-insensitively (`NOCASE`
///   collation on the indexed column).
/// - `collections.(owner_id, slug)` is unique per owner.
/// - `plate_collections.(plate_id, collection_id)` admits one row per pair.
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Opens (or creates) a catalog store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory catalog store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                handle TEXT COLLATE NOCASE,
                display_name TEXT,
                is_public INTEGER,
                updated_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS profiles_handle_unique
                ON profiles(handle) WHERE handle IS NOT NULL;

            CREATE TABLE IF NOT EXISTS plates (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                country_code TEXT NOT NULL,
                region_code TEXT,
                year INTEGER,
                serial TEXT,
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS plates_owner ON plates(owner_id);

            CREATE TABLE IF NOT EXISTS collections (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                slug TEXT COLLATE NOCASE,
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS collections_owner_slug_unique
                ON collections(owner_id, slug) WHERE slug IS NOT NULL;

            CREATE TABLE IF NOT EXISTS plate_collections (
                plate_id TEXT NOT NULL,
                collection_id TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                UNIQUE(plate_id, collection_id)
            );

            CREATE INDEX IF NOT EXISTS plate_collections_collection
                ON plate_collections(collection_id);
            ",
        )?;
        Ok(())
    }

    // ── Profiles ─────────────────────────────────────────────────

    /// Creates the owner's profile if it does not exist yet, then returns
    /// it. Called at first sign-in; idempotent.
    pub fn ensure_profile(&self, owner: OwnerId) -> StoreResult<Profile> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT OR IGNORE INTO profiles (id, updated_at) VALUES (?1, ?2)",
                params![owner.to_string(), now_millis()],
            )?;
        }
        self.get_profile(owner)?
            .ok_or_else(|| StoreError::NotFound(format!("profile {owner}")))
    }

    /// Reads one profile by owner id.
    pub fn get_profile(&self, owner: OwnerId) -> StoreResult<Option<Profile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, handle, display_name, is_public FROM profiles WHERE id = ?1",
        )?;
        let mut rows = stmt
            .query_map(params![owner.to_string()], profile_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.pop())
    }

    /// Sets the owner's handle (already normalized by the caller).
    ///
    /// Duplicate handles, including ones differing only by case, are
    /// rejected by the schema and surfaced as `UniquenessViolation`.
    pub fn update_profile_handle(&self, owner: OwnerId, handle: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE profiles SET handle = ?2, updated_at = ?3 WHERE id = ?1",
                params![owner.to_string(), handle, now_millis()],
            )
            .map_err(|e| map_constraint(e, format!("handle '{handle}'")))?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("profile {owner}")));
        }
        debug!(%owner, handle, "profile handle updated");
        Ok(())
    }

    /// Sets the owner's display name.
    pub fn update_profile_display_name(
        &self,
        owner: OwnerId,
        display_name: Option<&str>,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE profiles SET display_name = ?2, updated_at = ?3 WHERE id = ?1",
            params![owner.to_string(), display_name, now_millis()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("profile {owner}")));
        }
        Ok(())
    }

    /// Sets the profile's public flag.
    pub fn set_profile_visibility(&self, owner: OwnerId, is_public: bool) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE profiles SET is_public = ?2, updated_at = ?3 WHERE id = ?1",
            params![owner.to_string(), is_public, now_millis()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("profile {owner}")));
        }
        Ok(())
    }

    /// Resolves a handle to a profile, case-insensitively.
    ///
    /// Two profiles differing only by case would be a data-integrity fault;
    /// the schema prevents it, and a store that somehow holds both gets
    /// `AmbiguousHandle` here rather than an arbitrary winner.
    pub fn lookup_profile_by_handle(&self, handle: &str) -> StoreResult<Option<Profile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, handle, display_name, is_public FROM profiles WHERE handle = ?1",
        )?;
        let mut rows = stmt
            .query_map(params![handle], profile_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        if rows.len() > 1 {
            return Err(StoreError::AmbiguousHandle(handle.to_string()));
        }
        Ok(rows.pop())
    }

    // ── Plates ───────────────────────────────────────────────────

    /// Inserts a plate. Owner and timestamps are already stamped on the
    /// record; the store never rewrites them.
    pub fn insert_plate(&self, plate: &Plate) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO plates (id, owner_id, country_code, region_code, year, serial, is_public, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                plate.id.to_string(),
                plate.owner.to_string(),
                plate.country_code,
                plate.region_code,
                plate.year,
                plate.serial,
                plate.is_public,
                plate.created_at,
            ],
        )
        .map_err(|e| map_constraint(e, format!("plate {}", plate.id)))?;
        debug!(plate = %plate.id, owner = %plate.owner, "plate inserted");
        Ok(())
    }

    /// Deletes a plate the owner owns, along with its membership links.
    /// Row and links go in one transaction; a failed delete leaves both.
    pub fn delete_plate(&self, owner: OwnerId, plate: PlateId) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM plates WHERE id = ?1 AND owner_id = ?2",
            params![plate.to_string(), owner.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("plate {plate}")));
        }
        tx.execute(
            "DELETE FROM plate_collections WHERE plate_id = ?1 AND owner_id = ?2",
            params![plate.to_string(), owner.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Reads plates matching the filter, newest first.
    pub fn read_plates(&self, filter: &PlateFilter) -> StoreResult<Vec<Plate>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = String::from(
            "SELECT id, owner_id, country_code, region_code, year, serial, is_public, created_at
             FROM plates",
        );
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(owner) = filter.owner {
            values.push(Value::Text(owner.to_string()));
            clauses.push(format!("owner_id = ?{}", values.len()));
        }
        if let Some(is_public) = filter.is_public {
            values.push(Value::Integer(i64::from(is_public)));
            clauses.push(format!("is_public = ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), plate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Collections ──────────────────────────────────────────────

    /// Inserts a collection. A duplicate slug within the owner's
    /// collections is rejected by the schema.
    pub fn insert_collection(&self, collection: &Collection) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO collections (id, owner_id, name, description, slug, is_public, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                collection.id.to_string(),
                collection.owner.to_string(),
                collection.name,
                collection.description,
                collection.slug,
                collection.is_public,
                collection.created_at,
            ],
        )
        .map_err(|e| {
            let what = match &collection.slug {
                Some(slug) => format!("slug '{slug}'"),
                None => format!("collection {}", collection.id),
            };
            map_constraint(e, what)
        })?;
        debug!(collection = %collection.id, owner = %collection.owner, "collection inserted");
        Ok(())
    }

    /// Deletes a collection the owner owns, along with its membership
    /// links. Row and links go in one transaction.
    pub fn delete_collection(&self, owner: OwnerId, collection: CollectionId) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM collections WHERE id = ?1 AND owner_id = ?2",
            params![collection.to_string(), owner.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!("collection {collection}")));
        }
        tx.execute(
            "DELETE FROM plate_collections WHERE collection_id = ?1 AND owner_id = ?2",
            params![collection.to_string(), owner.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Reads collections matching the filter, newest first.
    pub fn read_collections(&self, filter: &CollectionFilter) -> StoreResult<Vec<Collection>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = String::from(
            "SELECT id, owner_id, name, description, slug, is_public, created_at
             FROM collections",
        );
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(owner) = filter.owner {
            values.push(Value::Text(owner.to_string()));
            clauses.push(format!("owner_id = ?{}", values.len()));
        }
        if let Some(is_public) = filter.is_public {
            values.push(Value::Integer(i64::from(is_public)));
            clauses.push(format!("is_public = ?{}", values.len()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), collection_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Reads one collection by id, owner-filtered.
    pub fn get_collection(
        &self,
        owner: OwnerId,
        collection: CollectionId,
    ) -> StoreResult<Option<Collection>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, name, description, slug, is_public, created_at
             FROM collections WHERE id = ?1 AND owner_id = ?2",
        )?;
        let mut rows = stmt
            .query_map(
                params![collection.to_string(), owner.to_string()],
                collection_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.pop())
    }

    /// Resolves `(owner, slug)` to a public collection, case-insensitively
    /// on the slug. Private collections are excluded in the query itself.
    pub fn find_public_collection(
        &self,
        owner: OwnerId,
        slug: &str,
    ) -> StoreResult<Option<Collection>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, owner_id, name, description, slug, is_public, created_at
             FROM collections WHERE owner_id = ?1 AND slug = ?2 AND is_public = 1",
        )?;
        let mut rows = stmt
            .query_map(params![owner.to_string(), slug], collection_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.pop())
    }

    // ── Memberships ──────────────────────────────────────────────

    /// Links a plate into a collection.
    ///
    /// The insert only happens when the caller's owner id owns both the
    /// plate and the collection (row-filtered guards in the statement);
    /// otherwise nothing matches and `NotFound` is returned. A duplicate
    /// `(plate, collection)` pair is rejected by the schema.
    pub fn insert_membership(&self, link: &Membership) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT INTO plate_collections (plate_id, collection_id, owner_id, added_at)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE EXISTS (SELECT 1 FROM plates WHERE id = ?1 AND owner_id = ?3)
                   AND EXISTS (SELECT 1 FROM collections WHERE id = ?2 AND owner_id = ?3)",
                params![
                    link.plate.to_string(),
                    link.collection.to_string(),
                    link.owner.to_string(),
                    link.added_at,
                ],
            )
            .map_err(|e| {
                map_constraint(e, format!("plate {} in collection {}", link.plate, link.collection))
            })?;
        if inserted == 0 {
            return Err(StoreError::NotFound(
                "plate or collection not owned by caller".to_string(),
            ));
        }
        debug!(plate = %link.plate, collection = %link.collection, "membership inserted");
        Ok(())
    }

    /// Removes a plate from a collection, owner-filtered.
    pub fn delete_membership(
        &self,
        owner: OwnerId,
        plate: PlateId,
        collection: CollectionId,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM plate_collections
             WHERE plate_id = ?1 AND collection_id = ?2 AND owner_id = ?3",
            params![plate.to_string(), collection.to_string(), owner.to_string()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound(format!(
                "plate {plate} in collection {collection}"
            )));
        }
        Ok(())
    }

    /// Reads the plates linked into a collection, newest link first.
    ///
    /// `public_only` restricts the join to public plates inside the query;
    /// the private rows never leave the store. `owner` additionally pins
    /// the membership rows to one owner (the owner-facing collection page).
    pub fn read_membership_plates(
        &self,
        collection: CollectionId,
        owner: Option<OwnerId>,
        public_only: bool,
    ) -> StoreResult<Vec<Plate>> {
        let conn = self.conn.lock().unwrap();
        let mut sql = String::from(
            "SELECT p.id, p.owner_id, p.country_code, p.region_code, p.year, p.serial, p.is_public, p.created_at
             FROM plates p
             JOIN plate_collections pc ON pc.plate_id = p.id
             WHERE pc.collection_id = ?1",
        );
        let mut values: Vec<Value> = vec![Value::Text(collection.to_string())];
        if let Some(owner) = owner {
            values.push(Value::Text(owner.to_string()));
            sql.push_str(&format!(" AND pc.owner_id = ?{}", values.len()));
        }
        if public_only {
            sql.push_str(" AND p.is_public = 1");
        }
        sql.push_str(" ORDER BY pc.added_at DESC, p.id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), plate_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of membership rows for one `(plate, collection)` pair.
    /// The uniqueness constraint keeps this at 0 or 1.
    pub fn membership_count(
        &self,
        plate: PlateId,
        collection: CollectionId,
    ) -> StoreResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM plate_collections WHERE plate_id = ?1 AND collection_id = ?2",
            params![plate.to_string(), collection.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Sitemap enumeration ──────────────────────────────────────

    /// All advertisable handles with their last-modified time: non-empty
    /// handle, profile not explicitly private.
    pub fn public_handles(&self) -> StoreResult<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT handle, updated_at FROM profiles
             WHERE handle IS NOT NULL AND handle != ''
               AND (is_public IS NULL OR is_public != 0)
             ORDER BY handle",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All advertisable public collection pages as `(handle, slug,
    /// lastmod)`: collection public with a slug, owner with an
    /// advertisable handle.
    pub fn public_collection_refs(&self) -> StoreResult<Vec<(String, String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT pr.handle, c.slug, c.created_at
             FROM collections c
             JOIN profiles pr ON pr.id = c.owner_id
             WHERE c.is_public = 1 AND c.slug IS NOT NULL
               AND pr.handle IS NOT NULL AND pr.handle != ''
               AND (pr.is_public IS NULL OR pr.is_public != 0)
             ORDER BY pr.handle, c.slug",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Maps a schema constraint rejection to the user-visible uniqueness error;
/// everything else stays a database error.
fn map_constraint(e: rusqlite::Error, what: String) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref err, _) = e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            return StoreError::UniquenessViolation(what);
        }
    }
    StoreError::Database(e)
}

fn parse_id<T, E>(parse: impl FnOnce(&str) -> Result<T, E>, s: String, idx: usize) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    parse(&s).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let id: String = row.get(0)?;
    Ok(Profile {
        id: parse_id(OwnerId::parse, id, 0)?,
        handle: row.get(1)?,
        display_name: row.get(2)?,
        is_public: row.get(3)?,
    })
}

fn plate_from_row(row: &Row<'_>) -> rusqlite::Result<Plate> {
    let id: String = row.get(0)?;
    let owner: String = row.get(1)?;
    Ok(Plate {
        id: parse_id(PlateId::parse, id, 0)?,
        owner: parse_id(OwnerId::parse, owner, 1)?,
        country_code: row.get(2)?,
        region_code: row.get(3)?,
        year: row.get(4)?,
        serial: row.get(5)?,
        is_public: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn collection_from_row(row: &Row<'_>) -> rusqlite::Result<Collection> {
    let id: String = row.get(0)?;
    let owner: String = row.get(1)?;
    Ok(Collection {
        id: parse_id(CollectionId::parse, id, 0)?,
        owner: parse_id(OwnerId::parse, owner, 1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        slug: row.get(4)?,
        is_public: row.get(5)?,
        created_at: row.get(6)?,
    })
}
