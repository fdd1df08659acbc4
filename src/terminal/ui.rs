use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::compose::{ComposeDraft, ComposeField};
use crate::app::render::{CardStyle, DetailPane, EmailCard, LOADING, MailboxPane, Screen};
use crate::app::view::ViewKind;
use crate::terminal::state::TuiState;

pub fn render(f: &mut Frame, state: &TuiState) {
    let [main, footer] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(f.area());

    match state.app.screen() {
        Screen::Mailbox(pane) => render_mailbox(f, main, state, &pane),
        Screen::Detail(pane) => render_detail(f, main, state, &pane),
        Screen::Compose(draft) => render_compose(f, main, state.field, &draft),
    }

    render_footer(f, footer, state);
}

fn card_item(card: &EmailCard) -> ListItem<'static> {
    let (head, text) = match card.style {
        CardStyle::Read => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        ),
        CardStyle::Unread => (
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        ),
    };

    let mut first = vec![
        Span::styled(card.sender.clone(), head),
        Span::raw("  "),
        Span::styled(card.timestamp.clone(), Style::default().fg(Color::Gray)),
    ];
    if let Some(toggle) = &card.archive {
        first.push(Span::raw("  "));
        first.push(Span::styled(
            format!("[{}]", toggle.label),
            Style::default().fg(Color::Cyan),
        ));
    }

    ListItem::new(Text::from(vec![
        Line::from(first),
        Line::from(Span::styled(card.subject.clone(), text)),
    ]))
}

fn render_mailbox(f: &mut Frame, area: Rect, state: &TuiState, pane: &MailboxPane) {
    let block = Block::default()
        .title(format!(" {} ", pane.header))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    if let Some(notice) = pane.notice {
        let p = Paragraph::new(notice).block(block);
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = pane.cards.iter().map(card_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)));

    f.render_stateful_widget(list, area, &mut state.list_state.clone());
}

fn render_detail(f: &mut Frame, area: Rect, state: &TuiState, pane: &DetailPane) {
    let block = Block::default()
        .title(" Email ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = match pane {
        DetailPane::Loading => Text::from(LOADING),
        DetailPane::Failed(msg) => Text::from(Line::from(Span::styled(
            *msg,
            Style::default().fg(Color::Red),
        ))),
        DetailPane::Loaded(card) => {
            let mut lines = vec![Line::from(Span::styled(
                card.from.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if let Some(to) = &card.to {
                lines.push(Line::from(to.clone()));
            }
            lines.push(Line::from(Span::styled(
                card.subject.clone(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                card.timestamp.clone(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("[{}]", card.reply_label),
                Style::default().fg(Color::Cyan),
            )));
            lines.push(Line::default());
            lines.extend(card.body.lines().map(|l| Line::from(l.to_string())));
            Text::from(lines)
        }
    };

    let p = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.body_scroll, 0));
    f.render_widget(p, area);
}

fn render_compose(f: &mut Frame, area: Rect, focus: ComposeField, draft: &ComposeDraft) {
    let [recipients, subject, body] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    for (field, rect) in [
        (ComposeField::Recipients, recipients),
        (ComposeField::Subject, subject),
        (ComposeField::Body, body),
    ] {
        let border = if field == focus {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(format!(" {} ", field.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let mut value = draft.field(field).to_string();
        if field == focus {
            value.push('▏');
        }
        let p = Paragraph::new(value).block(block).wrap(Wrap { trim: false });
        f.render_widget(p, rect);
    }
}

fn key_hint<'a>(key: &'a str, label: &'a str) -> [Span<'a>; 2] {
    [
        Span::styled(key, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(label),
    ]
}

fn render_footer(f: &mut Frame, area: Rect, state: &TuiState) {
    if let Some(status) = state.app.status() {
        let p = Paragraph::new(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Green),
        )));
        f.render_widget(p, area);
        return;
    }

    let hints: &[(&str, &str)] = match state.app.kind() {
        ViewKind::Mailbox => &[
            ("i/s/a", " inbox/sent/archive  "),
            ("c", " compose  "),
            ("j/k", " move  "),
            ("Enter", " open  "),
            ("e", " archive  "),
            ("q", " quit"),
        ],
        ViewKind::Detail => &[
            ("r", " reply  "),
            ("Esc", " back  "),
            ("j/k", " scroll  "),
            ("q", " quit"),
        ],
        ViewKind::Compose => &[
            ("Tab", " next field  "),
            ("Ctrl+S", " send  "),
            ("Esc", " discard"),
        ],
    };
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| key_hint(key, label))
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
