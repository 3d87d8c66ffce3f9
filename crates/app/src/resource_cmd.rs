//! Resource subcommands.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use portal_domain::{ApiRequest, FileType, FileUpload, MemberFilter, MultipartField, NewsItem};
use portal_infrastructure::{Portal, attach_file};

use crate::output;

/// Endpoint subcommands; each resource lists when no action is given.
#[derive(clap::Subcommand, Debug)]
pub enum ResourceCommand {
    /// GET any endpoint and print the body.
    Get {
        /// Endpoint path relative to the API base URL, e.g. `news/list`.
        path: String,
        /// Query parameter as `key=value`; repeatable.
        #[arg(short, long = "query", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,
    },
    /// News articles.
    News {
        #[command(subcommand)]
        action: Option<NewsAction>,
    },
    /// Document repositories.
    Files {
        #[command(subcommand)]
        action: Option<FilesAction>,
    },
    /// Product catalog.
    Products {
        #[command(subcommand)]
        action: Option<SimpleAction>,
    },
    /// Image gallery.
    Gallery {
        #[command(subcommand)]
        action: Option<GalleryAction>,
    },
    /// Cooperative members.
    Members {
        #[command(subcommand)]
        action: Option<MembersAction>,
    },
    /// User accounts.
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum NewsAction {
    /// List articles.
    List,
    /// Publish an article.
    Create {
        /// Headline.
        #[arg(long)]
        title: String,
        /// Article text.
        #[arg(long)]
        content: String,
        /// Visible without signing in.
        #[arg(long)]
        public: bool,
    },
    /// Delete an article.
    Delete { id: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum FilesAction {
    /// List documents, from one repository or all readable ones.
    List {
        /// Repository, e.g. `minutes` or `governing_documents`.
        #[arg(long = "type")]
        file_type: Option<FileType>,
    },
    /// Upload a document.
    Upload {
        /// File to send.
        path: PathBuf,
        /// Target repository.
        #[arg(long = "type")]
        file_type: FileType,
        /// Display name; defaults to the file name.
        #[arg(long)]
        name: Option<String>,
        /// User id allowed to read a private document; repeatable.
        #[arg(long = "allowed-to")]
        allowed_to: Vec<String>,
    },
    /// Download a document.
    Download {
        id: String,
        /// Repository the document is in.
        #[arg(long = "type")]
        file_type: FileType,
        /// Where to write it; defaults to the server-given name in the
        /// current directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a document.
    Delete { id: String },
}

/// Actions for resources that are only listed or deleted from here.
#[derive(clap::Subcommand, Debug)]
pub enum SimpleAction {
    /// List entries.
    List,
    /// Delete an entry.
    Delete { id: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum GalleryAction {
    /// List images.
    List,
    /// Upload an image.
    Upload {
        /// Image file.
        path: PathBuf,
        /// Display name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete an image.
    Delete { id: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum MembersAction {
    /// List members.
    List {
        /// Only members acting as proxies.
        #[arg(long)]
        proxy_only: bool,
        /// Only members with this role.
        #[arg(long)]
        role: Option<String>,
    },
    /// Replace the registry from a spreadsheet export.
    Sync {
        /// Spreadsheet file.
        path: PathBuf,
    },
    /// Delete a member.
    Delete { member_code: String },
}

#[derive(clap::Subcommand, Debug)]
pub enum UsersAction {
    /// List all accounts.
    List,
    /// List the board.
    Board,
    /// List the control committee.
    Control,
    /// Delete an account.
    Delete { id: String },
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Executes a resource subcommand.
pub async fn run(command: ResourceCommand, portal: &Portal, out: &mut impl Write) -> anyhow::Result<()> {
    let api = portal.api();
    match command {
        ResourceCommand::Get { path, query } => {
            let request = query
                .into_iter()
                .fold(ApiRequest::get(path), |request, (key, value)| request.with_query(key, value));
            let response = portal.gateway().send(&request).await?;
            output::body(out, &response)
        }
        ResourceCommand::News { action } => match action.unwrap_or(NewsAction::List) {
            NewsAction::List => output::json(out, &api.news().list().await?),
            NewsAction::Create { title, content, public } => {
                let mut item = NewsItem::new(title, content);
                item.is_public = public;
                api.news().create(&item).await?;
                done(out)
            }
            NewsAction::Delete { id } => {
                api.news().delete(&id).await?;
                done(out)
            }
        },
        ResourceCommand::Files { action } => {
            match action.unwrap_or(FilesAction::List { file_type: None }) {
                FilesAction::List { file_type: Some(file_type) } => {
                    output::json(out, &api.files().list(file_type).await?)
                }
                FilesAction::List { file_type: None } => output::json(out, &api.files().list_all().await),
                FilesAction::Upload {
                    path,
                    file_type,
                    name,
                    allowed_to,
                } => {
                    let file = read_file(&path).await?;
                    let file_name = name.unwrap_or_else(|| display_name(&path));
                    api.files()
                        .upload(FileUpload {
                            file_name,
                            file_type,
                            allowed_to,
                            file,
                        })
                        .await?;
                    done(out)
                }
                FilesAction::Download { id, file_type, output } => {
                    let listing = api.files().metadata(file_type).await?;
                    let file = listing
                        .iter()
                        .find(|file| file.id.as_deref() == Some(id.as_str()))
                        .with_context(|| format!("no document {id} in {file_type}"))?;
                    let download = api.files().download(file).await?;
                    let target = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
                    tokio::fs::write(&target, &download.bytes)
                        .await
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    writeln!(out, "Saved {} ({} bytes)", target.display(), download.bytes.len())?;
                    Ok(())
                }
                FilesAction::Delete { id } => {
                    api.files().delete(&id).await?;
                    done(out)
                }
            }
        }
        ResourceCommand::Products { action } => match action.unwrap_or(SimpleAction::List) {
            SimpleAction::List => output::json(out, &api.products().list().await?),
            SimpleAction::Delete { id } => {
                api.products().delete(&id).await?;
                done(out)
            }
        },
        ResourceCommand::Gallery { action } => match action.unwrap_or(GalleryAction::List) {
            GalleryAction::List => output::json(out, &api.gallery().list().await?),
            GalleryAction::Upload { path, name } => {
                let image = read_file(&path).await?;
                api.gallery().upload(image, name.as_deref()).await?;
                done(out)
            }
            GalleryAction::Delete { id } => {
                api.gallery().delete(&id).await?;
                done(out)
            }
        },
        ResourceCommand::Members { action } => {
            let action = action.unwrap_or(MembersAction::List {
                proxy_only: false,
                role: None,
            });
            match action {
                MembersAction::List { proxy_only, role } => {
                    let filter = MemberFilter { proxy_only, role };
                    output::json(out, &api.members().list(&filter).await?)
                }
                MembersAction::Sync { path } => {
                    api.members().sync(read_file(&path).await?).await?;
                    done(out)
                }
                MembersAction::Delete { member_code } => {
                    api.members().delete(&member_code).await?;
                    done(out)
                }
            }
        }
        ResourceCommand::Users { action } => match action.unwrap_or(UsersAction::List) {
            UsersAction::List => output::json(out, &api.users().list().await?),
            UsersAction::Board => output::json(out, &api.users().board().await?),
            UsersAction::Control => output::json(out, &api.users().control().await?),
            UsersAction::Delete { id } => {
                api.users().delete(&id).await?;
                done(out)
            }
        },
    }
}

async fn read_file(path: &Path) -> anyhow::Result<MultipartField> {
    attach_file("file", path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// File name without its extension, the default document title.
fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn done(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Done")?;
    Ok(())
}
