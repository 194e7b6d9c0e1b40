use crate::app::{App, LoadStatus};
use crate::braille::BrailleCanvas;
use crate::layout::{self, CLOSE_LABEL};
use crate::map::{MapLayers, RegionPaint};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let screen = layout::screen(frame.area());

    render_map(frame, app, screen.map, screen.map_inner);
    render_popup(frame, app, screen.map_inner);
    render_status_bar(frame, app, screen.status);

    if app.detail.is_some() {
        render_detail(frame, app);
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect, inner: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Districts ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, area);

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &app.viewport,
        &app.feature_state,
    );

    frame.render_widget(
        MapWidget {
            layers,
            paint: app.map_renderer.paint,
        },
        inner,
    );
}

/// Braille map with the fill layer under the outline layer
struct MapWidget {
    layers: MapLayers,
    paint: RegionPaint,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);

        for cy in 0..rows {
            for cx in 0..cols {
                if let Some(ch) = canvas.glyph(cx, cy) {
                    let x = area.x + cx as u16;
                    let y = area.y + cy as u16;
                    buf[(x, y)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.fill, self.paint.fill.color, area, buf);
        Self::render_layer(&self.layers.outline, self.paint.outline.color, area, buf);
    }
}

fn render_popup(frame: &mut Frame, app: &App, inner: Rect) {
    let Some(popup) = &app.popup else {
        return;
    };
    let (lon, lat) = popup.lng_lat();
    let (px, py) = app.viewport.project(lon, lat);
    let Some(anchor) = layout::pixel_to_cell(inner, px, py) else {
        return;
    };

    let text = Line::from(Span::styled(
        popup.text(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    let text_width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    let area = layout::popup_rect(inner, anchor, text_width).intersection(frame.area());
    if area.is_empty() {
        return;
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        ),
        area,
    );
}

fn render_detail(frame: &mut Frame, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };
    let area = frame.area();
    let modal = layout::modal(area);

    // Dim the overview behind the overlay
    frame.buffer_mut().set_style(area, Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(Clear, modal.outer);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(
            format!(" {} ", detail.region().name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block, modal.outer);

    let layers = detail.render(modal.inner.width as usize, modal.inner.height as usize);
    frame.render_widget(
        MapWidget {
            layers,
            paint: detail.renderer().paint,
        },
        modal.inner,
    );

    let button = modal.close_button;
    if button.width > 0 {
        let label: String = CLOSE_LABEL.chars().take(button.width as usize).collect();
        frame.buffer_mut().set_string(
            button.x,
            button.y,
            label,
            Style::default().fg(Color::Black).bg(Color::White),
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
    ];

    match &app.load_status {
        LoadStatus::Loading => spans.push(Span::styled("loading…", Style::default().fg(Color::Magenta))),
        LoadStatus::Failed(e) => spans.push(Span::styled(
            format!("failed to load data: {e}"),
            Style::default().fg(Color::Red),
        )),
        LoadStatus::Ready => spans.push(Span::styled(
            format!("{} districts", app.map_renderer.source().len()),
            Style::default().fg(Color::Green),
        )),
    }

    if let Some(name) = app.hovered_name() {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(name.to_string(), Style::default().fg(Color::White)));
    }

    let hints = if app.has_modal() {
        " | hjkl:pan +/-:zoom f:fit Esc:close"
    } else {
        " | hjkl:pan +/-:zoom f:fit r:reset Enter:open q:quit"
    };
    spans.push(Span::styled(hints, dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
