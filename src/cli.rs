use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};

use jenkins_service::config::Config;
use jenkins_service::{
    CredentialScope, JenkinsService, JenkinsServiceImpl, UsernamePasswordCredential,
};

use crate::output::{self, Spinner};

#[derive(Parser)]
#[command(name = "jenkins-service")]
#[command(author, version, about = "Jenkins remote API client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./jenkins-service.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Jenkins server URL
    #[arg(short, long, global = true, env = "JENKINS_URL")]
    url: Option<String>,

    /// User for basic authentication
    #[arg(long, global = true, env = "JENKINS_USER")]
    user: Option<String>,

    /// Password or API token for basic authentication
    #[arg(long, global = true, env = "JENKINS_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and manage jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Trigger, cancel and inspect builds
    Build {
        #[command(subcommand)]
        command: BuildCommands,
    },
    /// Download a file from a job's workspace
    Download {
        job: String,
        /// Path relative to the workspace root
        relative_path: String,
        /// Local destination file
        dest: PathBuf,
    },
    /// Manage username/password credentials
    Credentials {
        #[command(subcommand)]
        command: CredentialCommands,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Exit with status 0 if the job exists, 1 otherwise
    Exists { job: String },
    /// Print the job's config.xml
    Config { job: String },
    Create {
        job: String,
        /// File containing the job's config.xml
        #[arg(long)]
        xml: PathBuf,
    },
    Update {
        job: String,
        /// File containing the job's config.xml
        #[arg(long)]
        xml: PathBuf,
    },
    Delete { job: String },
}

#[derive(Subcommand)]
enum BuildCommands {
    /// Trigger a build and print its expected number
    Trigger { job: String },
    Cancel {
        job: String,
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },
    /// Print a build's console output
    Log {
        job: String,
        #[arg(allow_negative_numbers = true)]
        number: i64,
    },
    /// Show a build's status, or answer a single status question
    Status {
        job: String,
        #[arg(allow_negative_numbers = true)]
        number: i64,
        #[arg(long, value_enum)]
        check: Option<StatusCheck>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusCheck {
    Building,
    Finished,
    Success,
}

#[derive(Subcommand)]
enum CredentialCommands {
    Create {
        #[arg(long)]
        id: String,
        #[arg(long)]
        username: String,
        /// Password stored in the new credential
        #[arg(
            long = "secret",
            id = "secret",
            env = "JENKINS_CREDENTIAL_PASSWORD",
            hide_env_values = true
        )]
        secret: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long)]
        system: bool,
    },
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Xml,
}

impl Cli {
    fn service(&self) -> Result<JenkinsServiceImpl> {
        let config = Config::load(self.config.as_deref())?;
        let jenkins =
            config
                .jenkins
                .merge(self.url.clone(), self.user.clone(), self.password.clone());
        info!("Using Jenkins at {}", jenkins.url);
        Ok(JenkinsServiceImpl::from_config(&jenkins))
    }

    async fn execute_job(service: &JenkinsServiceImpl, command: &JobCommands) -> Result<()> {
        match command {
            JobCommands::Exists { job } => {
                let exists = service.job_exists(job).await?;
                println!("{}", output::yes_no(exists));
                if !exists {
                    std::process::exit(1);
                }
            }
            JobCommands::Config { job } => {
                print!("{}", service.get_job_xml(job).await?);
            }
            JobCommands::Create { job, xml } => {
                let job_xml = read_xml(xml)?;
                service.create_job(job, &job_xml).await?;
                eprintln!("Created job {job}");
            }
            JobCommands::Update { job, xml } => {
                let job_xml = read_xml(xml)?;
                service.update_job(job, &job_xml).await?;
                eprintln!("Updated job {job}");
            }
            JobCommands::Delete { job } => {
                service.delete_job(job).await?;
                eprintln!("Deleted job {job}");
            }
        }
        Ok(())
    }

    async fn execute_build(service: &JenkinsServiceImpl, command: &BuildCommands) -> Result<()> {
        match command {
            BuildCommands::Trigger { job } => {
                let number = service.build_job(job).await?;
                println!("{number}");
            }
            BuildCommands::Cancel { job, number } => {
                service.cancel_build(job, *number).await?;
                eprintln!("Requested stop of {job} #{number}");
            }
            BuildCommands::Log { job, number } => {
                print!("{}", service.get_build_log(job, *number).await?);
            }
            BuildCommands::Status { job, number, check } => {
                let answer = match check {
                    Some(StatusCheck::Building) => service.is_building(job, *number).await?,
                    Some(StatusCheck::Finished) => service.is_finished(job, *number).await?,
                    Some(StatusCheck::Success) => service.is_successful(job, *number).await?,
                    None => {
                        match service.get_build(job, *number).await? {
                            Some(build) => println!("{}", output::build_status_table(job, &build)),
                            None => anyhow::bail!("Build #{number} of {job} does not exist"),
                        }
                        return Ok(());
                    }
                };
                println!("{}", output::yes_no(answer));
                if !answer {
                    std::process::exit(1);
                }
            }
        }
        Ok(())
    }

    async fn execute_download(
        service: &JenkinsServiceImpl,
        job: &str,
        relative_path: &str,
        dest: &Path,
    ) -> Result<()> {
        let spinner = Spinner::start(&format!("Downloading {relative_path} from {job}"));
        match service.download_file(job, relative_path, dest).await {
            Ok(()) => {
                spinner.succeed(&format!("Saved {}", dest.display()));
                Ok(())
            }
            Err(err) => {
                spinner.fail(&format!("Download of {relative_path} failed"));
                Err(err.into())
            }
        }
    }

    async fn execute_credentials(
        service: &JenkinsServiceImpl,
        command: &CredentialCommands,
    ) -> Result<()> {
        match command {
            CredentialCommands::Create {
                id,
                username,
                secret,
                description,
                format,
                system,
            } => {
                let mut credential =
                    UsernamePasswordCredential::new(id, username, secret.as_str(), description);
                if *system {
                    credential = credential.with_scope(CredentialScope::System);
                }
                match format {
                    Format::Json => service.create_credentials_by_json(&credential).await?,
                    Format::Xml => service.create_credentials_by_xml(&credential).await?,
                }
                eprintln!("Created credentials {id}");
            }
            CredentialCommands::Delete { id } => {
                service.delete_credentials(id).await?;
                eprintln!("Deleted credentials {id}");
            }
        }
        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let service = self.service()?;

        match &self.command {
            Commands::Job { command } => Self::execute_job(&service, command).await,
            Commands::Build { command } => Self::execute_build(&service, command).await,
            Commands::Download {
                job,
                relative_path,
                dest,
            } => Self::execute_download(&service, job, relative_path, dest).await,
            Commands::Credentials { command } => {
                Self::execute_credentials(&service, command).await
            }
        }
    }
}

fn read_xml(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job XML: {}", path.display()))
}
