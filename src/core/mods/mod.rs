pub mod manager;
pub mod name_cache;

pub use manager::{
    decode_mod_state, delete_mod, install_mod, list_mods, toggle_mod, toggled_filename, ModEntry,
    DISABLED_SUFFIX,
};
pub use name_cache::NameCache;
