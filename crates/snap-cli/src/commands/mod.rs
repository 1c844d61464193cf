pub mod dispatch;
pub mod history;
pub mod init;
pub mod install;
pub mod list;
pub mod modules;
pub mod run;
pub mod schema;
pub mod shared;
pub mod show;
pub mod toggle;
pub mod uninstall;
pub mod update;
