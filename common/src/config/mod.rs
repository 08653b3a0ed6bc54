use serde::de::DeserializeOwned;

const DEPLOY_ENVIRONMENTS: &[&str] = &["development", "qa", "staging", "production"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration used by unit and integration tests.
    ///
    /// `.env.test.local` and `.env.test` are read before the default file
    /// chain. Variables are never overridden: the OS environment wins, then
    /// the first file that defines a variable.
    pub fn load_test<TConfig>() -> TConfig
    where
        TConfig: DeserializeOwned,
    {
        dotenv::from_filename(".env.test.local").ok();
        dotenv::from_filename(".env.test").ok();
        Self::load::<TConfig>()
    }

    /// Loads the deployed configuration.
    ///
    /// Reads `.env.<environment>.local` then `.env.<environment>` for every
    /// known deploy environment, then `.env.local` and `.env`. Variables
    /// already set (by the OS environment or an earlier file) are kept.
    pub fn load_default<TConfig>() -> TConfig
    where
        TConfig: DeserializeOwned,
    {
        for environment in DEPLOY_ENVIRONMENTS {
            dotenv::from_filename(format!(".env.{environment}.local")).ok();
            dotenv::from_filename(format!(".env.{environment}")).ok();
        }

        Self::load::<TConfig>()
    }

    fn load<TConfig>() -> TConfig
    where
        TConfig: DeserializeOwned,
    {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env").ok();

        envy::from_env::<TConfig>().expect("Could not load configuration")
    }
}
