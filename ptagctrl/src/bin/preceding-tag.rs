use anyhow::Context;
use clap::Parser;
use ptagctrl::{
    PrecedingTag,
    input::Input,
    output::{
        ActionOutput,
        error_command,
    },
};
use ptagrepo::{
    GitHubClient,
    transport::ReqwestTransport,
};
use std::process::ExitCode;

fn run(args: Input) -> anyhow::Result<()> {
    let config = args.validate()?;
    let transport = ReqwestTransport::new(config.api_url, config.token)?;
    let client = GitHubClient::new(transport, config.repository, config.policy);
    log::info!(
        "finding the tag preceding {} in {}",
        config.reference,
        client.repository(),
    );

    let rt = tokio::runtime::Runtime::new()?;
    let tag = rt.block_on(async {
        PrecedingTag::new(&client)
            .resolve(&config.reference, &config.options)
            .await
    })?;
    match &tag {
        Some(tag) => log::info!("found {tag}"),
        None => log::info!("no tag found; using {:?}", config.default_tag),
    }

    ActionOutput::from_env()
        .context("failed to open the step output")?
        .write_result(tag.as_ref(), &config.default_tag)
        .context("failed to write the step output")?;
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Input::parse();
    if let Err(e) = stderrlog::new()
        .module(module_path!())
        .module("ptagctrl")
        .module("ptagrepo")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
    {
        eprintln!("failed to initialize logging: {e}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            println!("{}", error_command(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
