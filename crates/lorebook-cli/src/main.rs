use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lorebook_config::Config;
use lorebook_engine::{
    FallbackTitles, FsDocumentSource, LinkResolver, NoGameObjects, PageEnvironment, RenderNode,
    io, render_page,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::{Component, RelativePath, RelativePathBuf};
use std::{env, io::stdout, path::PathBuf, process};

struct App {
    content_path: PathBuf,
    documents: Vec<RelativePathBuf>,
    document_list_state: ListState,
    resolver: LinkResolver,
    source: FsDocumentSource,
    current_title: String,
    current_content: Vec<String>,
}

impl App {
    fn new(content_path: PathBuf) -> Result<Self> {
        let documents = io::scan_documents(&content_path)?;
        let resolver = io::index_documents(&content_path)?.into_resolver();
        let source = FsDocumentSource::new(&content_path);

        let mut app = Self {
            content_path,
            documents,
            document_list_state: ListState::default(),
            resolver,
            source,
            current_title: String::new(),
            current_content: Vec::new(),
        };

        // Select first document if available
        if !app.documents.is_empty() {
            app.document_list_state.select(Some(0));
            app.update_content_for_selection();
        }

        Ok(app)
    }

    fn next_document(&mut self) {
        let i = match self.document_list_state.selected() {
            Some(i) => (i + 1) % self.documents.len(),
            None => 0,
        };
        self.document_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_document(&mut self) {
        let i = match self.document_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.documents.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.document_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn update_content_for_selection(&mut self) {
        if let Some(index) = self.document_list_state.selected()
            && let Some(path) = self.documents.get(index)
        {
            match io::read_document(path, &self.content_path) {
                Ok(raw) => {
                    let fallbacks = FallbackTitles::new();
                    let env = PageEnvironment {
                        resolver: &self.resolver,
                        game: &NoGameObjects,
                        source: &self.source,
                        wiki_id: wiki_id_of(path),
                        fallback_titles: &fallbacks,
                    };
                    let page = render_page(&raw, path, &env);
                    self.current_title = page.title.clone();
                    self.current_content = render_nodes(&page.nodes, 0);
                }
                Err(e) => {
                    self.current_title = path.to_string();
                    self.current_content = vec![format!("Error reading document: {}", e)];
                }
            }
        }
    }
}

/// Book id a document belongs to, taken from its `books/<id>/...` prefix.
fn wiki_id_of(path: &RelativePath) -> &str {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(first)), Some(Component::Normal(second)))
            if first == lorebook_engine::DOC_ROOT =>
        {
            second
        }
        _ => "",
    }
}

fn render_nodes(nodes: &[RenderNode], indent: usize) -> Vec<String> {
    let pad = "  ".repeat(indent);
    let mut lines = Vec::new();

    for node in nodes {
        match node {
            RenderNode::Text(text) => {
                for line in text.plain_text().lines() {
                    lines.push(format!("{}{}", pad, line));
                }
                lines.push(String::new()); // Empty line after paragraph
            }
            RenderNode::Image { location, .. } => {
                lines.push(format!("{}[image: {}]", pad, location));
                lines.push(String::new());
            }
            RenderNode::ItemIcon { item_id, .. } => {
                lines.push(format!("{}[item: {}]", pad, item_id));
                lines.push(String::new());
            }
            RenderNode::Recipe { result, count, .. } => {
                lines.push(format!("{}[recipe: {} x{}]", pad, result, count));
                lines.push(String::new());
            }
            RenderNode::Callout { variant, children, .. } => {
                lines.push(format!("{}[{}]", pad, variant));
                lines.extend(render_nodes(children, indent + 1));
            }
            RenderNode::Code { literal, .. } => {
                lines.push(format!("{}```", pad));
                lines.extend(literal.lines().map(|s| format!("{}{}", pad, s)));
                lines.push(format!("{}```", pad));
                lines.push(String::new());
            }
        }
    }

    lines
}

fn main() -> Result<()> {
    // Determine content path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let content_path;
    let from_config;

    if args.len() == 2 {
        // CLI argument provided - use it
        content_path = PathBuf::from(&args[1]);
        from_config = false;
    } else if args.len() == 1 {
        // No CLI argument - try config file
        match Config::load() {
            Ok(Some(config)) => {
                content_path = config.content_path;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No content path provided and no config file found");
                eprintln!("Usage: {} <content-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <content-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [content-folder-path]", args[0]);
        process::exit(1);
    };

    // Validate content directory using engine
    if let Err(e) = io::validate_content_root(&content_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Content path '{}'{} is invalid: {e}",
            content_path.display(),
            source
        );
        process::exit(1);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(content_path)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_document(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_document(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(f.area());

    // Document list panel
    let document_items: Vec<ListItem> = app
        .documents
        .iter()
        .map(|path| ListItem::new(vec![Line::from(vec![Span::raw(path.to_string())])]))
        .collect();

    let documents_list = List::new(document_items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(documents_list, chunks[0], &mut app.document_list_state);

    // Page panel
    let content_text = if app.current_content.is_empty() {
        vec![Line::from("Select a document to view its page")]
    } else {
        app.current_content
            .iter()
            .map(|line| Line::from(vec![Span::raw(line.clone())]))
            .collect()
    };

    let title = if app.current_title.is_empty() {
        "Page".to_string()
    } else {
        app.current_title.clone()
    };
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(content, chunks[1]);

    // Instructions
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next"),
    ]);

    let help = Paragraph::new(vec![help_text]).block(Block::default());

    // Place help at bottom
    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    f.render_widget(help, bottom_chunk[1]);
}
