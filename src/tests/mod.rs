use std::path::{Path, PathBuf};

use crate::{
    discovery,
    job::Pipeline,
    material::{self, FilamentProfileEntry, MaterialDatabase},
};

mod run;
mod sync;

const PROFILE_DIR: &str = "src/tests/profiles";
const VERSION: &str = "1700000000";

fn profile(name: &str) -> PathBuf {
    Path::new(PROFILE_DIR).join(name)
}

fn baseline_pipeline() -> Pipeline {
    Pipeline::new(
        MaterialDatabase::baseline().unwrap(),
        material::baseline_options().unwrap(),
        VERSION,
    )
}

fn find<'a>(database: &'a MaterialDatabase, id: &str) -> &'a FilamentProfileEntry {
    database
        .find(id)
        .unwrap_or_else(|| panic!("entry {id} not found"))
}

#[tokio::test]
async fn discovers_identified_profiles_only() {
    let paths = discovery::find_profiles(Path::new(PROFILE_DIR))
        .await
        .unwrap();
    assert_eq!(
        paths,
        vec![profile("acme_silk_pla.json"), profile("generic_petg_hf.json")]
    );
}
