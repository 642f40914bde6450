use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::Result;
use crate::feedback::{collect_notes, SectionNotes};
use crate::notion::{deliver, DocumentSink, PageHandle};
use crate::parser::{parse_sessions, Session};
use crate::render::{render_session, render_sessions, RenderedPage};
use crate::sheets::{parse_cell_ref, CellSource, CommentSink, SheetRef};

pub fn week_title(week: u32) -> String {
    format!("Week {}", week)
}

pub fn session_title(number: usize) -> String {
    format!("Session {}", number)
}

pub struct PublishOptions<'a> {
    pub owner: &'a str,
    pub parent_id: &'a str,
    pub range: &'a str,
    pub week: u32,
    pub icon: Option<&'a str>,
    pub per_session: bool,
}

#[derive(Debug)]
pub struct PublishSummary {
    pub sheet: SheetRef,
    pub page: PageHandle,
    pub sessions: usize,
    pub blocks: usize,
}

/// Sheet `Week N` -> sessions -> page `Week N` (optionally one child page
/// per session).
pub async fn publish_week<C, D>(cells: &C, docs: &D, opts: &PublishOptions<'_>) -> Result<PublishSummary>
where
    C: CellSource,
    D: DocumentSink,
{
    let title = week_title(opts.week);
    let sheet = cells.find_sheet(opts.owner, &title).await?;
    let grid = cells.get_range(&sheet.id, opts.range).await?;
    let sessions = parse_sessions(&grid);
    info!(sheet = %sheet.name, sessions = sessions.len(), "parsed sheet");
    if sessions.is_empty() {
        warn!(sheet = %sheet.name, range = opts.range, "no sessions found");
    }

    let icon = opts.icon.map(str::to_string);
    let (page, blocks) = if opts.per_session {
        publish_per_session(docs, opts.parent_id, &title, icon, &sessions).await?
    } else {
        let page = RenderedPage::new(&title, icon, render_sessions(&sessions));
        let blocks = page.blocks.len();
        (deliver(docs, opts.parent_id, &page).await?, blocks)
    };

    Ok(PublishSummary {
        sheet,
        page,
        sessions: sessions.len(),
        blocks,
    })
}

async fn publish_per_session<D: DocumentSink>(
    docs: &D,
    parent_id: &str,
    title: &str,
    icon: Option<String>,
    sessions: &[Session],
) -> Result<(PageHandle, usize)> {
    let week_page = deliver(docs, parent_id, &RenderedPage::new(title, icon.clone(), Vec::new())).await?;

    let pb = ProgressBar::new(sessions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut blocks = 0;
    for session in sessions {
        let page = RenderedPage::new(session_title(session.number), icon.clone(), render_session(session));
        blocks += page.blocks.len();
        pb.set_message(page.title.clone());
        deliver(docs, &week_page.0, &page).await?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok((week_page, blocks))
}

pub struct FeedbackOptions<'a> {
    pub owner: &'a str,
    pub parent_id: &'a str,
    pub week: u32,
    pub session: usize,
    pub cell: &'a str,
    pub tab: &'a str,
}

/// Page `Week N / Session S` -> split notes -> note on `cell` of sheet `Week N`.
///
/// Returns `None` without touching the sheet when the page has no
/// recognizable notes.
pub async fn post_feedback<D, S>(docs: &D, sheets: &S, opts: &FeedbackOptions<'_>) -> Result<Option<SectionNotes>>
where
    D: DocumentSink,
    S: CellSource + CommentSink,
{
    let (row, col) = parse_cell_ref(opts.cell)?;
    let title = week_title(opts.week);

    let notes = collect_notes(docs, opts.parent_id, &title, &session_title(opts.session)).await?;
    if notes.is_empty() {
        warn!(week = %title, session = opts.session, "page has no overall/lower/upper notes");
        return Ok(None);
    }

    let sheet = sheets.find_sheet(opts.owner, &title).await?;
    let gid = sheets.sheet_gid(&sheet.id, opts.tab).await?;
    sheets
        .set_cell_note(&sheet.id, gid, row, col, &notes.combined())
        .await?;
    Ok(Some(notes))
}
