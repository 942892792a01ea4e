mod script;
mod scripted_driver;

pub use script::{Script, ScriptedError, ScriptedResponse, load_script_from_str};
pub use scripted_driver::{
    RecordedArtifact, RecordedConnect, RecordedTls, ScriptedConnection, ScriptedDriver,
};
