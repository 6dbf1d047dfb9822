use anyhow::Context;
use heal_config::HealConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, layered config, and apply `--db` on top.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<HealConfig> {
    let mut config = HealConfig::load_with_dotenv().context("failed to load healgraph config")?;
    apply_flag_overrides(&mut config, flags);
    config.validate()?;
    Ok(config)
}

fn apply_flag_overrides(config: &mut HealConfig, flags: &GlobalFlags) {
    if let Some(db) = &flags.db {
        config.store.path.clone_from(db);
    }
}
