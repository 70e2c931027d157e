//! Buyer dashboard: product browsing with debounced search suggestions,
//! skin-type filtering, product details, and the ad-hoc ingredient check.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Margin;
use ratatui::layout::Rect;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use dermascan_api::AnalysisReport;
use dermascan_api::CheckProductRequest;
use dermascan_api::ProductDetail;
use dermascan_api::ProductSummary;
use dermascan_api::SkinType;

use crate::analysis_view::report_lines;
use crate::app_event::AppEvent;
use crate::forms::SkinSelect;
use crate::forms::TextField;
use crate::forms::cycle_focus;
use crate::ocr::OcrSection;
use crate::screens::Ctx;
use crate::screens::Nav;
use crate::scroll_state::ScrollState;
use crate::search::SearchAction;
use crate::search::SearchField;
use crate::tasks;
use crate::ui_colors::ACCENT;

const GRID_ROWS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuyerView {
    Browse,
    Check,
    Analysis,
    ProductDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseFocus {
    Search,
    Grid,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckFocus {
    ProdType,
    SkinType,
    OcrPath,
    Ingredients,
}

const CHECK_FOCUS_ORDER: [CheckFocus; 4] = [
    CheckFocus::ProdType,
    CheckFocus::SkinType,
    CheckFocus::OcrPath,
    CheckFocus::Ingredients,
];

struct CheckForm {
    prod_type: TextField,
    skin_type: SkinSelect,
    ocr: OcrSection,
    focus: usize,
}

impl CheckForm {
    fn new() -> Self {
        Self {
            prod_type: TextField::new("Product Type"),
            skin_type: SkinSelect::new(&SkinType::FILTERABLE),
            ocr: OcrSection::new(),
            focus: 0,
        }
    }

    fn focus(&self) -> CheckFocus {
        CHECK_FOCUS_ORDER[self.focus]
    }

    /// Validate and assemble the check request; `Err` blocks submission.
    fn build_request(&self) -> Result<CheckProductRequest, String> {
        let skin_type = self.skin_type.value();
        if self.prod_type.is_blank() || skin_type.is_none() || self.ocr.ingredients.is_blank() {
            return Err(
                "Please fill in Product Type, Your Skin Type, and provide ingredients before \
                 checking."
                    .to_string(),
            );
        }
        let skin_type = skin_type.ok_or("Your Skin Type is required")?;
        Ok(CheckProductRequest {
            prod_type: self.prod_type.value().trim().to_string(),
            skin_type: skin_type.as_str().to_string(),
            ingredients: self.ocr.ingredients.value().trim().to_string(),
        })
    }
}

pub struct BuyerDashboard {
    view: BuyerView,
    browse_focus: BrowseFocus,
    search: SearchField,
    products: Vec<ProductSummary>,
    products_loading: bool,
    grid_state: ScrollState,
    filter_open: bool,
    filter_cursor: usize,
    filter_selected: Vec<SkinType>,
    check: CheckForm,
    analysis: Option<AnalysisReport>,
    analysis_loading: bool,
    show_explanation: bool,
    detail: Option<ProductDetail>,
    detail_loading: bool,
    image_index: usize,
}

impl BuyerDashboard {
    /// Enter the dashboard on the browse grid, kicking off the full listing.
    pub fn new(ctx: &mut Ctx) -> Self {
        tasks::spawn_products_default(ctx.client, ctx.tx);
        let mut search = SearchField::new();
        search.set_focused(false);
        Self {
            view: BuyerView::Browse,
            browse_focus: BrowseFocus::Grid,
            search,
            products: Vec::new(),
            products_loading: true,
            grid_state: ScrollState::new(),
            filter_open: false,
            filter_cursor: 0,
            filter_selected: Vec::new(),
            check: CheckForm::new(),
            analysis: None,
            analysis_loading: false,
            show_explanation: false,
            detail: None,
            detail_loading: false,
            image_index: 0,
        }
    }

    /// Dashboard with no initial fetch, for state-machine tests.
    #[cfg(test)]
    fn new_for_tests() -> Self {
        Self {
            view: BuyerView::Browse,
            browse_focus: BrowseFocus::Grid,
            search: SearchField::new(),
            products: Vec::new(),
            products_loading: false,
            grid_state: ScrollState::new(),
            filter_open: false,
            filter_cursor: 0,
            filter_selected: Vec::new(),
            check: CheckForm::new(),
            analysis: None,
            analysis_loading: false,
            show_explanation: false,
            detail: None,
            detail_loading: false,
            image_index: 0,
        }
    }

    /// Navigation between the two top-level buyer views. Transient analysis
    /// and detail state is dropped unless we are entering those views.
    fn change_view(&mut self, view: BuyerView) {
        self.view = view;
        self.filter_open = false;
        if self.browse_focus == BrowseFocus::Filter {
            self.browse_focus = BrowseFocus::Grid;
        }
        if view == BuyerView::Check {
            // Navigating away from browsing discards the query and its
            // cached suggestions.
            self.search.clear();
            self.search.set_focused(false);
            self.browse_focus = BrowseFocus::Grid;
        }
        if !matches!(view, BuyerView::Analysis | BuyerView::ProductDetail) {
            self.analysis = None;
            self.detail = None;
            self.analysis_loading = false;
            self.detail_loading = false;
            self.show_explanation = false;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Nav {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('b') => {
                    self.change_view(BuyerView::Browse);
                    return Nav::None;
                }
                KeyCode::Char('k') => {
                    self.change_view(BuyerView::Check);
                    return Nav::None;
                }
                KeyCode::Char('f') if self.view == BuyerView::Browse => {
                    self.toggle_filter();
                    return Nav::None;
                }
                _ => {}
            }
        }
        match self.view {
            BuyerView::Browse => self.handle_browse_key(key, ctx),
            BuyerView::Check => {
                self.handle_check_key(key, ctx);
                Nav::None
            }
            BuyerView::Analysis => {
                self.handle_analysis_key(key);
                Nav::None
            }
            BuyerView::ProductDetail => {
                self.handle_detail_key(key);
                Nav::None
            }
        }
    }

    fn toggle_filter(&mut self) {
        self.filter_open = !self.filter_open;
        self.browse_focus = if self.filter_open {
            self.search.set_focused(false);
            BrowseFocus::Filter
        } else {
            BrowseFocus::Grid
        };
    }

    fn handle_browse_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Nav {
        match self.browse_focus {
            BrowseFocus::Search => match key.code {
                KeyCode::Tab => {
                    self.browse_focus = BrowseFocus::Grid;
                    self.search.set_focused(false);
                }
                _ => {
                    let action = self.search.handle_key(key);
                    self.apply_search_action(action, ctx);
                }
            },
            BrowseFocus::Grid => match key.code {
                KeyCode::Tab | KeyCode::Char('/') => {
                    self.browse_focus = BrowseFocus::Search;
                    self.search.set_focused(true);
                }
                KeyCode::Up => {
                    self.grid_state.move_up_wrap(self.products.len());
                    self.grid_state.ensure_visible(self.products.len(), GRID_ROWS);
                }
                KeyCode::Down => {
                    self.grid_state.move_down_wrap(self.products.len());
                    self.grid_state.ensure_visible(self.products.len(), GRID_ROWS);
                }
                KeyCode::Enter => {
                    if let Some(product) = self
                        .grid_state
                        .selected_idx
                        .and_then(|idx| self.products.get(idx))
                    {
                        let product_id = product.product_id;
                        self.detail = None;
                        self.detail_loading = true;
                        self.image_index = 0;
                        self.view = BuyerView::ProductDetail;
                        tasks::spawn_product_details(ctx.client, ctx.tx, product_id);
                    }
                }
                KeyCode::Esc => return Nav::RoleSelect,
                _ => {}
            },
            BrowseFocus::Filter => match key.code {
                KeyCode::Esc => self.toggle_filter(),
                KeyCode::Up => {
                    self.filter_cursor =
                        cycle_focus(self.filter_cursor, SkinType::FILTERABLE.len(), false);
                }
                KeyCode::Down => {
                    self.filter_cursor =
                        cycle_focus(self.filter_cursor, SkinType::FILTERABLE.len(), true);
                }
                KeyCode::Char(' ') => {
                    let skin_type = SkinType::FILTERABLE[self.filter_cursor];
                    if let Some(pos) = self
                        .filter_selected
                        .iter()
                        .position(|selected| *selected == skin_type)
                    {
                        self.filter_selected.remove(pos);
                    } else {
                        self.filter_selected.push(skin_type);
                    }
                }
                KeyCode::Enter | KeyCode::Char('a') => {
                    self.products_loading = true;
                    if self.filter_selected.is_empty() {
                        tasks::spawn_products_default(ctx.client, ctx.tx);
                    } else {
                        tasks::spawn_products_filter(
                            ctx.client,
                            ctx.tx,
                            self.filter_selected.clone(),
                        );
                    }
                    self.toggle_filter();
                }
                KeyCode::Char('c') => {
                    self.filter_selected.clear();
                    self.products_loading = true;
                    tasks::spawn_products_default(ctx.client, ctx.tx);
                }
                _ => {}
            },
        }
        Nav::None
    }

    fn apply_search_action(&mut self, action: SearchAction, ctx: &mut Ctx) {
        match action {
            SearchAction::None => {}
            SearchAction::ScheduleFetch { generation, query } => {
                tasks::schedule_suggestion_debounce(ctx.tx, generation, query);
            }
            SearchAction::Search(term) => {
                self.products_loading = true;
                self.grid_state.reset();
                tasks::spawn_products_search(ctx.client, ctx.tx, term);
            }
        }
    }

    fn handle_check_key(&mut self, key: KeyEvent, ctx: &mut Ctx) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.submit_check(ctx),
                KeyCode::Char('e') => self.run_ocr(ctx),
                KeyCode::Char('x') => self.check.ocr.clear_image(),
                _ => {}
            }
            return;
        }
        let focus = self.check.focus();
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.check.focus = cycle_focus(self.check.focus, CHECK_FOCUS_ORDER.len(), true);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.check.focus = cycle_focus(self.check.focus, CHECK_FOCUS_ORDER.len(), false);
            }
            KeyCode::Enter if focus == CheckFocus::OcrPath => {
                if let Err(message) = self.check.ocr.pick() {
                    ctx.show_error(message);
                }
            }
            KeyCode::Enter => {
                self.check.focus = cycle_focus(self.check.focus, CHECK_FOCUS_ORDER.len(), true);
            }
            _ => {
                match focus {
                    CheckFocus::ProdType => self.check.prod_type.handle_key(key),
                    CheckFocus::SkinType => self.check.skin_type.handle_key(key),
                    CheckFocus::OcrPath => self.check.ocr.path.handle_key(key),
                    CheckFocus::Ingredients => self.check.ocr.ingredients.handle_key(key),
                };
            }
        }
    }

    fn run_ocr(&mut self, ctx: &mut Ctx) {
        if self.check.ocr.processing {
            return;
        }
        match self.check.ocr.extract_request() {
            Some(image) => {
                self.check.ocr.processing = true;
                tasks::spawn_ocr(ctx.client, ctx.tx, image);
            }
            None => ctx.show_error("Please select an image first!"),
        }
    }

    fn submit_check(&mut self, ctx: &mut Ctx) {
        if self.analysis_loading {
            return;
        }
        match self.check.build_request() {
            Ok(request) => {
                self.analysis = None;
                self.analysis_loading = true;
                self.show_explanation = false;
                self.view = BuyerView::Analysis;
                tasks::spawn_check(ctx.client, ctx.tx, request);
            }
            Err(message) => ctx.show_error(message),
        }
    }

    fn handle_analysis_key(&mut self, key: KeyEvent) {
        if self.analysis_loading {
            return;
        }
        match key.code {
            KeyCode::Char('e') => self.show_explanation = !self.show_explanation,
            KeyCode::Esc => self.change_view(BuyerView::Check),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if self.detail_loading {
            return;
        }
        let image_count = self
            .detail
            .as_ref()
            .map_or(0, |detail| detail.images.len());
        match key.code {
            KeyCode::Left if image_count > 0 => {
                self.image_index = (self.image_index + image_count - 1) % image_count;
            }
            KeyCode::Right if image_count > 0 => {
                self.image_index = (self.image_index + 1) % image_count;
            }
            KeyCode::Esc => self.change_view(BuyerView::Browse),
            _ => {}
        }
    }

    pub fn on_event(&mut self, event: AppEvent, ctx: &mut Ctx) {
        match event {
            AppEvent::SuggestionDebounceElapsed { generation, query } => {
                // Only the newest timer may fetch; superseded firings die here.
                if self.search.debounce_is_current(generation) {
                    tasks::spawn_suggestions(ctx.client, ctx.tx, generation, query);
                }
            }
            AppEvent::SuggestionsLoaded {
                generation,
                suggestions,
            } => self.search.on_suggestions(generation, suggestions),
            AppEvent::ProductsLoaded(result) => {
                self.products_loading = false;
                match result {
                    Ok(products) => {
                        self.products = products;
                        self.grid_state.clamp_selection(self.products.len());
                    }
                    Err(err) => {
                        tracing::error!("failed to fetch products: {err}");
                        self.products.clear();
                        ctx.show_error("Failed to load products.");
                    }
                }
            }
            AppEvent::ProductDetailLoaded(result) => {
                self.detail_loading = false;
                match result {
                    Ok(detail) => {
                        self.detail = Some(detail);
                        self.image_index = 0;
                    }
                    Err(err) => {
                        self.view = BuyerView::Browse;
                        ctx.show_error(format!("Failed to load product details: {err}"));
                    }
                }
            }
            AppEvent::CheckCompleted(result) => {
                self.analysis_loading = false;
                match result {
                    Ok(report) => self.analysis = Some(report),
                    Err(err) => {
                        self.view = BuyerView::Check;
                        ctx.show_error(format!("Analysis failed: {err}"));
                    }
                }
            }
            AppEvent::OcrCompleted(Ok(text)) => self.check.ocr.on_extracted(text),
            AppEvent::OcrCompleted(Err(err)) => {
                tracing::error!("ocr extraction failed: {err}");
                self.check.ocr.on_extract_failed();
                ctx.show_error("Failed to extract ingredients.");
            }
            other => tracing::debug!("buyer dashboard ignoring event: {other:?}"),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header_area, content_area, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header_area);
        match self.view {
            BuyerView::Browse => self.render_browse(frame, content_area),
            BuyerView::Check => self.render_check(frame, content_area),
            BuyerView::Analysis => self.render_analysis(frame, content_area),
            BuyerView::ProductDetail => self.render_detail(frame, content_area),
        }
        frame.render_widget(Line::from(self.footer_hint().dim()), footer_area);

        // The suggestion dropdown floats over whatever the content area
        // shows, anchored under the search slot in the header.
        if self.view == BuyerView::Browse && self.search.dropdown_visible() {
            let dropdown = Rect {
                x: header_area.x + 12,
                y: header_area.y + 1,
                width: 36.min(frame.area().width.saturating_sub(12)),
                height: self
                    .search
                    .dropdown_height()
                    .min(content_area.height + 1),
            };
            frame.render_widget(Clear, dropdown);
            self.search.render_dropdown(dropdown, frame.buffer_mut());
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let tab = |label: &'static str, active: bool| -> Span<'static> {
            if active {
                format!(" {label} ").bold().reversed()
            } else {
                format!(" {label} ").into()
            }
        };
        let browse_active = matches!(self.view, BuyerView::Browse | BuyerView::ProductDetail);
        let check_active = matches!(self.view, BuyerView::Check | BuyerView::Analysis);
        let mut spans: Vec<Span<'static>> = vec!["dermascan".bold().fg(ACCENT), "  ".into()];
        spans.extend(self.search.input_line().spans);
        spans.push("  ".into());
        spans.push(tab("Dashboard", browse_active));
        spans.push(tab("Check Products", check_active));
        if !self.filter_selected.is_empty() {
            spans.push(format!("  filters: {}", self.filter_summary()).dim());
        }
        frame.render_widget(
            Paragraph::new(vec![Line::from(spans), Line::default()]),
            area,
        );
    }

    fn filter_summary(&self) -> String {
        self.filter_selected
            .iter()
            .map(|skin_type| skin_type.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn footer_hint(&self) -> &'static str {
        match self.view {
            BuyerView::Browse => {
                "Tab search/grid · ↑↓ select · Enter details · ^F filters · ^K check · Esc back"
            }
            BuyerView::Check => "Tab fields · Enter pick photo · ^E extract · ^S check · ^B browse",
            BuyerView::Analysis => "e explanation · Esc check another product",
            BuyerView::ProductDetail => "←/→ gallery · Esc back to products",
        }
    }

    fn render_browse(&self, frame: &mut Frame, area: Rect) {
        let (grid_area, filter_area) = if self.filter_open {
            let [grid_area, filter_area] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(26)]).areas(area);
            (grid_area, Some(filter_area))
        } else {
            (area, None)
        };

        let inner = grid_area.inner(Margin::new(2, 1));
        let mut lines = vec![
            Line::from("Explore Our Curated Products".bold()),
            Line::from("Discover products verified for your skin's safety and needs.".dim()),
            Line::default(),
        ];
        if self.products_loading {
            lines.push(Line::from("Loading products…".dim()));
        } else if self.products.is_empty() {
            lines.push(Line::from("No products match the selected filters.".dim()));
        } else {
            let top = self.grid_state.scroll_top;
            for (idx, product) in self.products.iter().enumerate().skip(top).take(GRID_ROWS) {
                let selected = self.grid_state.selected_idx == Some(idx)
                    && self.browse_focus == BrowseFocus::Grid;
                let skin = product
                    .skin_type
                    .as_deref()
                    .map(|skin_type| format!("  For: {skin_type}"))
                    .unwrap_or_default();
                let text = format!(
                    "{} — ₹{}{skin}",
                    product.product_name,
                    format_price(product.price)
                );
                lines.push(if selected {
                    Line::from(format!("▸ {text}")).reversed()
                } else {
                    Line::from(format!("  {text}"))
                });
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(filter_area) = filter_area {
            self.render_filter(frame, filter_area);
        }
    }

    fn render_filter(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(Line::from("Apply Filters".bold()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![Line::from("Skin type".dim()), Line::default()];
        for (idx, skin_type) in SkinType::FILTERABLE.iter().enumerate() {
            let checked = self.filter_selected.contains(skin_type);
            let marker = if checked { "[x]" } else { "[ ]" };
            let text = format!("{marker} {}", skin_type.label());
            lines.push(if idx == self.filter_cursor {
                Line::from(text).reversed()
            } else {
                Line::from(text)
            });
        }
        lines.push(Line::default());
        lines.push(Line::from("Space toggle · Enter apply".dim()));
        lines.push(Line::from("c clear · Esc close".dim()));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_check(&self, frame: &mut Frame, area: Rect) {
        let focus = self.check.focus();
        let mut lines = vec![
            Line::from("Check Product Ingredients".bold()),
            Line::from(
                "Upload a photo of your product's ingredient list to get an instant analysis."
                    .dim(),
            ),
            Line::default(),
            self.check
                .prod_type
                .display_line(focus == CheckFocus::ProdType),
            self.check
                .skin_type
                .display_line("Your Skin Type", focus == CheckFocus::SkinType),
            Line::default(),
            Line::from("Ingredient list extraction".dim()),
            self.check.ocr.path.display_line(focus == CheckFocus::OcrPath),
        ];
        lines.push(match self.check.ocr.picked_name() {
            Some(name) if self.check.ocr.processing => {
                Line::from(format!("  {name} — extracting…").italic())
            }
            Some(name) => Line::from(format!("  {name} — ready (^E extract, ^X clear)").dim()),
            None => Line::from("  no photo picked".dim()),
        });
        lines.push(
            self.check
                .ocr
                .ingredients
                .display_line(focus == CheckFocus::Ingredients),
        );
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            area.inner(Margin::new(2, 1)),
        );
    }

    fn render_analysis(&self, frame: &mut Frame, area: Rect) {
        let inner = area.inner(Margin::new(2, 1));
        let lines = if self.analysis_loading {
            vec![
                Line::from("Analyzing Ingredients…".bold()),
                Line::from("This may take a moment. Please wait.".dim()),
            ]
        } else {
            match &self.analysis {
                Some(report) => report_lines(report, self.show_explanation, inner.width),
                None => vec![
                    Line::from("Analysis Not Available".bold()),
                    Line::from(
                        "The analysis could not be completed. Please go back and try again.".dim(),
                    ),
                ],
            }
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let inner = area.inner(Margin::new(2, 1));
        if self.detail_loading {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("Loading Product Details…".bold()),
                    Line::from("Please wait a moment.".dim()),
                ]),
                inner,
            );
            return;
        }
        let Some(detail) = &self.detail else {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("Error".bold()),
                    Line::from("Product details could not be loaded.".dim()),
                ]),
                inner,
            );
            return;
        };

        let mut lines = vec![
            Line::from(detail.product_name.to_uppercase().bold().fg(ACCENT)),
            Line::from(detail.description.clone()),
            Line::from(format!("₹{}", format_price(detail.price)).bold()),
        ];
        if let Some(skin_type) = &detail.skin_type {
            lines.push(Line::from(vec![
                "Suitable for: ".dim(),
                skin_type.clone().into(),
            ]));
        }
        if let Some(seller_email) = &detail.seller_email {
            lines.push(Line::from(vec![
                "Contact for queries: ".dim(),
                seller_email.clone().into(),
            ]));
        }
        if !detail.images.is_empty() {
            lines.push(Line::from(
                format!(
                    "image {}/{} (←/→ to browse the gallery)",
                    self.image_index + 1,
                    detail.images.len()
                )
                .dim(),
            ));
        }
        lines.push(Line::default());
        lines.push(Line::from("PRODUCT ANALYSIS".bold()));
        lines.extend(report_lines(&detail.analysis, self.show_explanation, inner.width));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_request_requires_all_three_inputs() {
        let mut form = CheckForm::new();
        assert!(form.build_request().is_err());

        form.prod_type.set_value("Moisturizer");
        form.skin_type
            .handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert!(form.build_request().is_err());

        form.ocr.ingredients.set_value("aqua, niacinamide");
        let request = form.build_request().expect("complete form");
        assert_eq!(request.prod_type, "Moisturizer");
        assert_eq!(request.skin_type, "oily");
    }

    #[test]
    fn leaving_analysis_views_drops_transient_state() {
        let mut dashboard = BuyerDashboard::new_for_tests();
        dashboard.analysis = Some(AnalysisReport::default());
        dashboard.show_explanation = true;
        dashboard.view = BuyerView::Analysis;

        // Entering the detail views keeps the transient state…
        dashboard.change_view(BuyerView::ProductDetail);
        assert!(dashboard.analysis.is_some());

        // …but returning to a top-level view clears it.
        dashboard.change_view(BuyerView::Browse);
        assert!(dashboard.analysis.is_none());
        assert!(!dashboard.show_explanation);
    }

    #[test]
    fn opening_the_filter_panel_moves_focus_and_blurs_search() {
        let mut dashboard = BuyerDashboard::new_for_tests();
        dashboard.search.set_focused(true);
        dashboard.toggle_filter();
        assert!(dashboard.filter_open);
        assert_eq!(dashboard.browse_focus, BrowseFocus::Filter);
        assert!(!dashboard.search.dropdown_visible());
        dashboard.toggle_filter();
        assert_eq!(dashboard.browse_focus, BrowseFocus::Grid);
    }
}
