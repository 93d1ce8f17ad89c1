use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Load `.env` files before clap reads the environment. Earlier files win
/// because dotenvy never overrides a variable that is already set.
pub fn load_dotenv_files() {
    let current_dir = std::env::current_dir().ok();

    let env_paths: [Option<PathBuf>; 2] = [
        current_dir.as_ref().map(|d| d.join(".env")),
        current_dir.as_ref().map(|d| d.join(".env.local")),
    ];

    for path in env_paths.iter().flatten() {
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
