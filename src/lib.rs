pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod login;
pub mod mock;
pub mod model;
pub mod normalize;
pub mod query;

pub use config::{CliArgs, PortalConfig};
pub use error::{GatewayError, PortalError};
pub use gateway::{DataGateway, Direction, SelectRequest, SupabaseGateway};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use login::{
    Captcha, Clock, JsonFileStore, LoginGuard, LoginState, MemoryStore, StateStore, SubmitOutcome,
    SystemClock,
};
pub use model::{
    DataSource, Domain, Karya, KaryaCategory, NewDonation, NewKarya, NewTask, Session, Sourced,
    WeekParity,
};
pub use query::{CacheStats, PortalClient};
