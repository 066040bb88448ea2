use crate::{
    libs::{config::Config, data_storage::DataStorage, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(short, long, help = "Print the configuration file location and exit")]
    show_path: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.show_path {
        let path = DataStorage::new().get_path(crate::libs::config::CONFIG_FILE_NAME)?;
        msg_info!(Message::ConfigCurrent(path.display().to_string()));
        return Ok(());
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
