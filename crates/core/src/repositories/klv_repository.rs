use authex_primitives::models::{KlvDictionary, KlvEntry};
use authex_primitives::schema::pmtol_klvmap;
use authex_primitives::GatewayError;
use diesel::prelude::*;

pub struct KlvRepository;

impl KlvRepository {
    /// Loads the whole key-index table into the in-memory dictionary.
    /// Called once at startup; an empty table is rejected by the caller.
    pub fn load_dictionary(conn: &mut PgConnection) -> Result<KlvDictionary, GatewayError> {
        let entries = pmtol_klvmap::table
            .order(pmtol_klvmap::key_index.asc())
            .load::<KlvEntry>(conn)?;
        Ok(KlvDictionary::from_entries(entries))
    }
}
