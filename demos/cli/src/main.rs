mod store;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use virchow_api::workflow::{load_report_lookups, sign_in};
use virchow_api::{ApiClient, ApiError, ClientConfig};
use virchow_core::patient::PatientSearchForm;
use virchow_core::report::ReportSearchForm;
use virchow_core::session::LoginForm;
use virchow_core::{Age, Cell, Session, Tabular};

use crate::store::FileStore;

#[derive(Parser, Debug)]
#[command(
    name = "virchow-cli",
    about = "Cliente de linha de comando para o serviço de laudos Virchow."
)]
struct Args {
    /// Arquivo onde a sessão (token, usuário) é guardada.
    #[arg(long, env = "VIRCHOW_SESSION", default_value = ".virchow-session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calcula a idade como exibida no laudo.
    Age {
        #[arg(long)]
        birth: NaiveDate,
        /// Data de referência; hoje por padrão.
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, env = "VIRCHOW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Lista os tipos de laudo e os estados civis.
    Exams,
    Diagnostics {
        exam_type_id: i64,
    },
    Patients {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        birth: Option<String>,
    },
    Reports {
        #[arg(long)]
        name: String,
        #[arg(long)]
        number: Option<String>,
    },
    /// Baixa o PDF de um laudo.
    Print {
        report_id: i64,
        #[arg(short, long)]
        output: PathBuf,
    },
    Invalidate {
        report_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env();
    let mut session = Session::new(FileStore::open(&args.session)?);
    let client = ApiClient::new(&config)
        .context("Não foi possível criar o cliente HTTP")?
        .with_token(session.token());

    let result = run(args.command, &client, &mut session).await;
    if let Err(err) = &result {
        if err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized)
        {
            session.handle_unauthorized();
            bail!("Sessão expirada. Execute `virchow-cli login` novamente.");
        }
    }
    result
}

async fn run(
    command: Command,
    client: &ApiClient,
    session: &mut Session<FileStore>,
) -> anyhow::Result<()> {
    match command {
        Command::Age { birth, on } => {
            let reference = on.unwrap_or_else(|| Local::now().date_naive());
            let age = Age::between(birth, reference)?;
            println!("{age}");
        }
        Command::Login { user, password } => {
            let form = LoginForm {
                login: user,
                password,
            };
            sign_in(client, session, &form).await?;
            let name = session
                .user()
                .and_then(|user| user.name)
                .unwrap_or_default();
            println!("Sessão iniciada: {name}");
        }
        Command::Logout => {
            session.sign_out();
            println!("Sessão encerrada.");
        }
        Command::Exams => {
            let lookups = load_report_lookups(client).await;
            let exam_types = lookups.exam_types.context("Erro ao listar tipos de laudos")?;
            for exam_type in exam_types {
                println!(
                    "{:>4}  {} ({} tópicos)",
                    exam_type.id,
                    exam_type.name,
                    exam_type.topics.len()
                );
            }
            let statuses = lookups
                .marital_statuses
                .context("Erro ao listar estados civis")?;
            let names: Vec<_> = statuses.iter().map(|status| status.description.as_str()).collect();
            println!("Estados civis: {}", names.join(", "));
        }
        Command::Diagnostics { exam_type_id } => {
            let codes = client
                .diagnostics(exam_type_id)
                .await
                .with_context(|| format!("Erro ao listar os diagnósticos do exame {exam_type_id}"))?;
            print_rows(&codes);
        }
        Command::Patients { name, birth } => {
            let form = PatientSearchForm {
                name,
                birth_date: birth.unwrap_or_default(),
                health_unit: String::new(),
            };
            let patients = client
                .search_patients(&form.to_filter())
                .await
                .context("Erro ao localizar paciente")?;
            print_rows(&patients);
        }
        Command::Reports { name, number } => {
            let form = ReportSearchForm {
                patient_name: name,
                report_number: number.unwrap_or_default(),
            };
            let reports = client
                .search_reports(&form.to_filter()?)
                .await
                .context("Erro ao localizar laudos")?;
            for report in &reports {
                let flag = if report.is_invalidated() { "  [invalidado]" } else { "" };
                println!("{}{flag}", row_text(report));
            }
        }
        Command::Print { report_id, output } => {
            let pdf = client
                .report_pdf(report_id)
                .await
                .with_context(|| format!("Não foi possível gerar a impressão do laudo {report_id}"))?;
            std::fs::write(&output, &pdf)
                .with_context(|| format!("Não foi possível gravar {:?}", output))?;
            println!("{} bytes gravados em {}", pdf.len(), output.display());
        }
        Command::Invalidate { report_id } => {
            let Some(user) = session.user() else {
                bail!("Nenhuma sessão ativa. Execute `virchow-cli login` primeiro.");
            };
            client
                .invalidate_report(report_id, user.id)
                .await
                .with_context(|| format!("Não foi possível invalidar o laudo {report_id}"))?;
            println!("Laudo {report_id} invalidado.");
        }
    }
    Ok(())
}

fn row_text<T: Tabular>(row: &T) -> String {
    T::COLUMNS
        .iter()
        .map(|column| match row.cell(column) {
            Cell::Empty => "-".to_string(),
            cell => cell.display().into_owned(),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn print_rows<T: Tabular>(rows: &[T]) {
    if rows.is_empty() {
        println!("Nenhum registro.");
        return;
    }
    for row in rows {
        println!("{}", row_text(row));
    }
}
