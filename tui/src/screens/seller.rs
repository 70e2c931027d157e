//! Seller dashboard: overview counts, product upload with OCR and image
//! staging, accepted/rejected product lists, product detail editing, and
//! account management.
//!
//! The dashboard holds a single current view. Switching views resets
//! view-scoped transient state (selection, edit buffers, analysis results)
//! and triggers the fetch the new view depends on. Navigation out of the
//! dashboard is locked; leaving goes through the explicit logout action.

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
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use dermascan_api::AccountUpdate;
use dermascan_api::AnalysisReport;
use dermascan_api::MAX_UPLOAD_IMAGES;
use dermascan_api::NewProductUpload;
use dermascan_api::ProductCounts;
use dermascan_api::ProductUpdate;
use dermascan_api::SellerAccount;
use dermascan_api::SellerProductDetail;
use dermascan_api::SellerProductSummary;
use dermascan_api::SkinType;

use crate::analysis_view::report_lines;
use crate::app_event::AppEvent;
use crate::app_event::ProductStatus;
use crate::forms::SkinSelect;
use crate::forms::TextField;
use crate::forms::cycle_focus;
use crate::forms::missing_fields;
use crate::image_list::PendingImageList;
use crate::modal::PendingAction;
use crate::ocr::OcrSection;
use crate::screens::Ctx;
use crate::screens::Nav;
use crate::scroll_state::ScrollState;
use crate::session::SessionIdentity;
use crate::tasks;
use crate::ui_colors::ACCENT;

const LIST_ROWS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerView {
    Overview,
    Upload,
    Accepted,
    Rejected,
    Analysis,
    ProductDetail,
    AccountDetails,
}

/// Server data a view depends on when entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewFetch {
    Counts,
    Accepted,
    Rejected,
    Account,
}

fn fetch_for_view(view: SellerView) -> Option<ViewFetch> {
    match view {
        SellerView::Overview => Some(ViewFetch::Counts),
        SellerView::Accepted => Some(ViewFetch::Accepted),
        SellerView::Rejected => Some(ViewFetch::Rejected),
        SellerView::AccountDetails => Some(ViewFetch::Account),
        SellerView::Upload | SellerView::Analysis | SellerView::ProductDetail => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadFocus {
    Name,
    ImagePath,
    ImageList,
    OcrPath,
    Ingredients,
    ProductType,
    BrandName,
    SkinType,
    Description,
    Price,
}

const UPLOAD_FOCUS_ORDER: [UploadFocus; 10] = [
    UploadFocus::Name,
    UploadFocus::ImagePath,
    UploadFocus::ImageList,
    UploadFocus::OcrPath,
    UploadFocus::Ingredients,
    UploadFocus::ProductType,
    UploadFocus::BrandName,
    UploadFocus::SkinType,
    UploadFocus::Description,
    UploadFocus::Price,
];

#[derive(Debug)]
struct UploadForm {
    product_name: TextField,
    image_path: TextField,
    images: PendingImageList,
    ocr: OcrSection,
    product_type: TextField,
    brand_name: TextField,
    skin_type: SkinSelect,
    description: TextField,
    price: TextField,
    focus: usize,
}

impl UploadForm {
    fn new() -> Self {
        Self {
            product_name: TextField::new("Product Name"),
            image_path: TextField::new("Add image (path)"),
            images: PendingImageList::new(),
            ocr: OcrSection::new(),
            product_type: TextField::new("Product Type"),
            brand_name: TextField::new("Brand Name"),
            skin_type: SkinSelect::new(&SkinType::ALL),
            description: TextField::new("Product Description"),
            price: TextField::new("Price (₹)"),
            focus: 0,
        }
    }

    fn focus(&self) -> UploadFocus {
        UPLOAD_FOCUS_ORDER[self.focus]
    }

    fn focus_next(&mut self) {
        self.focus = cycle_focus(self.focus, UPLOAD_FOCUS_ORDER.len(), true);
    }

    fn focus_prev(&mut self) {
        self.focus = cycle_focus(self.focus, UPLOAD_FOCUS_ORDER.len(), false);
    }
}

/// Validate the form and assemble the multipart payload. Any `Err` blocks
/// submission entirely; no request is issued.
fn build_upload(form: &UploadForm, seller_id: i64) -> Result<NewProductUpload, String> {
    if form.images.is_empty() {
        return Err("Please add at least one product image.".to_string());
    }
    if form.images.len() > MAX_UPLOAD_IMAGES {
        return Err(format!(
            "A product can carry at most {MAX_UPLOAD_IMAGES} images."
        ));
    }
    if form.ocr.ingredients.is_blank() {
        return Err(
            "Please provide ingredients for analysis (use OCR or type them manually).".to_string(),
        );
    }
    let mut missing = missing_fields(&[
        ("Product Name", form.product_name.value()),
        ("Product Description", form.description.value()),
        ("Price", form.price.value()),
        ("Product Type", form.product_type.value()),
        ("Brand Name", form.brand_name.value()),
    ]);
    if form.skin_type.value().is_none() {
        missing.push("Recommended Skin Type");
    }
    if !missing.is_empty() {
        return Err(format!(
            "Please fill out the following required fields: {}",
            missing.join(", ")
        ));
    }
    let price = form.price.value().trim();
    if price.parse::<f64>().is_err() {
        return Err("Price must be a number.".to_string());
    }
    let skin_type = form
        .skin_type
        .value()
        .ok_or("Recommended Skin Type is required")?;
    Ok(NewProductUpload {
        seller_id,
        product_name: form.product_name.value().trim().to_string(),
        description: form.description.value().trim().to_string(),
        price: price.to_string(),
        product_type: form.product_type.value().trim().to_string(),
        brand_name: form.brand_name.value().trim().to_string(),
        skin_type,
        ingredients: form.ocr.ingredients.value().trim().to_string(),
        images: form.images.attachments(),
    })
}

#[derive(Debug)]
struct ProductEditForm {
    product_name: TextField,
    brand_name: TextField,
    product_type: TextField,
    price: TextField,
    description: TextField,
    focus: usize,
}

impl ProductEditForm {
    fn from_detail(detail: &SellerProductDetail) -> Self {
        let mut form = Self {
            product_name: TextField::new("Product Name"),
            brand_name: TextField::new("Brand Name"),
            product_type: TextField::new("Product Type"),
            price: TextField::new("Price (₹)"),
            description: TextField::new("Product Description"),
            focus: 0,
        };
        form.product_name.set_value(detail.product_name.clone());
        form.brand_name.set_value(detail.brand_name.clone());
        form.product_type.set_value(detail.product_type.clone());
        form.price.set_value(format_price(detail.price));
        form.description.set_value(detail.description.clone());
        form
    }

    fn fields_mut(&mut self) -> [&mut TextField; 5] {
        [
            &mut self.product_name,
            &mut self.brand_name,
            &mut self.product_type,
            &mut self.price,
            &mut self.description,
        ]
    }

    fn to_update(&self) -> Result<ProductUpdate, String> {
        let price: f64 = self
            .price
            .value()
            .trim()
            .parse()
            .map_err(|_| "Price must be a number.".to_string())?;
        Ok(ProductUpdate {
            product_name: self.product_name.value().trim().to_string(),
            description: self.description.value().trim().to_string(),
            price,
            product_type: self.product_type.value().trim().to_string(),
            brand_name: self.brand_name.value().trim().to_string(),
        })
    }
}

#[derive(Debug)]
struct AccountEditForm {
    name: TextField,
    email: TextField,
    business_license_id: TextField,
    seller_phno: TextField,
    focus: usize,
}

impl AccountEditForm {
    fn from_account(account: &SellerAccount) -> Self {
        let mut form = Self {
            name: TextField::new("Name"),
            email: TextField::new("Email"),
            business_license_id: TextField::new("Business License ID"),
            seller_phno: TextField::new("Phone Number"),
            focus: 0,
        };
        form.name.set_value(account.name.clone());
        form.email.set_value(account.email.clone());
        form.business_license_id
            .set_value(account.business_license_id.clone());
        form.seller_phno.set_value(account.seller_phno.clone());
        form
    }

    fn fields_mut(&mut self) -> [&mut TextField; 4] {
        [
            &mut self.name,
            &mut self.email,
            &mut self.business_license_id,
            &mut self.seller_phno,
        ]
    }

    fn to_update(&self) -> Result<AccountUpdate, String> {
        let missing = missing_fields(&[
            ("Name", self.name.value()),
            ("Email", self.email.value()),
            ("Business License ID", self.business_license_id.value()),
        ]);
        if !missing.is_empty() {
            return Err(format!(
                "Name, email, and business license ID are required (missing: {})",
                missing.join(", ")
            ));
        }
        Ok(AccountUpdate {
            name: self.name.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            business_license_id: self.business_license_id.value().trim().to_string(),
            seller_phno: self.seller_phno.value().trim().to_string(),
        })
    }
}

pub struct SellerDashboard {
    pub identity: SessionIdentity,
    view: SellerView,
    counts: ProductCounts,
    accepted: Vec<SellerProductSummary>,
    rejected: Vec<SellerProductSummary>,
    loading_products: bool,
    list_state: ScrollState,
    upload: UploadForm,
    analysis: Option<AnalysisReport>,
    analysis_loading: bool,
    show_explanation: bool,
    detail: Option<SellerProductDetail>,
    detail_edit: Option<ProductEditForm>,
    account: Option<SellerAccount>,
    account_edit: Option<AccountEditForm>,
}

impl SellerDashboard {
    /// Enter the dashboard on the overview, kicking off its counts fetch.
    pub fn new(identity: SessionIdentity, ctx: &mut Ctx) -> Self {
        tasks::spawn_counts(ctx.client, ctx.tx, identity.seller_id);
        Self {
            identity,
            view: SellerView::Overview,
            counts: ProductCounts::default(),
            accepted: Vec::new(),
            rejected: Vec::new(),
            loading_products: false,
            list_state: ScrollState::new(),
            upload: UploadForm::new(),
            analysis: None,
            analysis_loading: false,
            show_explanation: false,
            detail: None,
            detail_edit: None,
            account: None,
            account_edit: None,
        }
    }

    /// Switch to a navigation target, dropping view-scoped transient state
    /// and starting the one fetch the target view depends on.
    fn change_view(&mut self, view: SellerView, ctx: &mut Ctx) {
        self.view = view;
        self.detail = None;
        self.detail_edit = None;
        self.account_edit = None;
        self.analysis = None;
        self.show_explanation = false;
        self.list_state.reset();
        if view == SellerView::AccountDetails {
            self.account = None;
        }
        if matches!(view, SellerView::Accepted | SellerView::Rejected) {
            self.loading_products = true;
        }
        let seller_id = self.identity.seller_id;
        match fetch_for_view(view) {
            Some(ViewFetch::Counts) => tasks::spawn_counts(ctx.client, ctx.tx, seller_id),
            Some(ViewFetch::Accepted) => tasks::spawn_accepted(ctx.client, ctx.tx, seller_id),
            Some(ViewFetch::Rejected) => tasks::spawn_rejected(ctx.client, ctx.tx, seller_id),
            Some(ViewFetch::Account) => tasks::spawn_account(ctx.client, ctx.tx, seller_id),
            None => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Ctx) -> Nav {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('o') => {
                    self.change_view(SellerView::Overview, ctx);
                    return Nav::None;
                }
                KeyCode::Char('u') => {
                    self.change_view(SellerView::Upload, ctx);
                    return Nav::None;
                }
                KeyCode::Char('a') => {
                    self.change_view(SellerView::Accepted, ctx);
                    return Nav::None;
                }
                KeyCode::Char('r') => {
                    self.change_view(SellerView::Rejected, ctx);
                    return Nav::None;
                }
                KeyCode::Char('d') => {
                    self.change_view(SellerView::AccountDetails, ctx);
                    return Nav::None;
                }
                KeyCode::Char('l') => return Nav::Logout,
                _ => {}
            }
        }
        match self.view {
            SellerView::Overview => {}
            SellerView::Upload => self.handle_upload_key(key, ctx),
            SellerView::Accepted => self.handle_list_key(key, ctx, ProductStatus::Accepted),
            SellerView::Rejected => self.handle_list_key(key, ctx, ProductStatus::Rejected),
            SellerView::Analysis => self.handle_analysis_key(key, ctx),
            SellerView::ProductDetail => self.handle_detail_key(key, ctx),
            SellerView::AccountDetails => self.handle_account_key(key, ctx),
        }
        Nav::None
    }

    fn handle_upload_key(&mut self, key: KeyEvent, ctx: &mut Ctx) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.submit_upload(ctx),
                KeyCode::Char('e') => self.run_ocr(ctx),
                KeyCode::Char('x') => self.upload.ocr.clear_image(),
                _ => {}
            }
            return;
        }
        let focus = self.upload.focus();
        match key.code {
            KeyCode::Tab => self.upload.focus_next(),
            KeyCode::BackTab => self.upload.focus_prev(),
            KeyCode::Up | KeyCode::Down if focus == UploadFocus::ImageList => {
                let len = self.upload.images.len();
                let up = key.code == KeyCode::Up;
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    if let Some(idx) = self.upload.images.state.selected_idx {
                        let to = if up { idx.checked_sub(1) } else { Some(idx + 1) };
                        if let Some(to) = to.filter(|to| *to < len) {
                            self.upload.images.move_item(idx, to);
                        }
                    }
                } else if up {
                    self.upload.images.state.move_up_wrap(len);
                } else {
                    self.upload.images.state.move_down_wrap(len);
                }
            }
            KeyCode::Up => self.upload.focus_prev(),
            KeyCode::Down => self.upload.focus_next(),
            KeyCode::Enter => match focus {
                UploadFocus::ImagePath => self.add_image(ctx),
                UploadFocus::OcrPath => {
                    if let Err(message) = self.upload.ocr.pick() {
                        ctx.show_error(message);
                    }
                }
                _ => self.upload.focus_next(),
            },
            KeyCode::Delete | KeyCode::Backspace if focus == UploadFocus::ImageList => {
                if let Some(idx) = self.upload.images.state.selected_idx {
                    self.upload.images.remove(idx);
                }
            }
            _ => {
                match focus {
                    UploadFocus::Name => self.upload.product_name.handle_key(key),
                    UploadFocus::ImagePath => self.upload.image_path.handle_key(key),
                    UploadFocus::ImageList => false,
                    UploadFocus::OcrPath => self.upload.ocr.path.handle_key(key),
                    UploadFocus::Ingredients => self.upload.ocr.ingredients.handle_key(key),
                    UploadFocus::ProductType => self.upload.product_type.handle_key(key),
                    UploadFocus::BrandName => self.upload.brand_name.handle_key(key),
                    UploadFocus::SkinType => self.upload.skin_type.handle_key(key),
                    UploadFocus::Description => self.upload.description.handle_key(key),
                    UploadFocus::Price => self.upload.price.handle_key(key),
                };
            }
        }
    }

    fn add_image(&mut self, ctx: &mut Ctx) {
        if self.upload.images.len() >= MAX_UPLOAD_IMAGES {
            ctx.show_error(format!(
                "A product can carry at most {MAX_UPLOAD_IMAGES} images."
            ));
            return;
        }
        let raw = self.upload.image_path.value().trim().to_string();
        if raw.is_empty() {
            ctx.show_error("Enter the path of a product image first.");
            return;
        }
        match self.upload.images.add_file(raw.as_ref()) {
            Ok(()) => self.upload.image_path.clear(),
            Err(message) => ctx.show_error(message),
        }
    }

    fn run_ocr(&mut self, ctx: &mut Ctx) {
        if self.upload.ocr.processing {
            return;
        }
        match self.upload.ocr.extract_request() {
            Some(image) => {
                self.upload.ocr.processing = true;
                tasks::spawn_ocr(ctx.client, ctx.tx, image);
            }
            None => ctx.show_error("Please select an ingredient image first!"),
        }
    }

    fn submit_upload(&mut self, ctx: &mut Ctx) {
        if self.analysis_loading {
            return;
        }
        match build_upload(&self.upload, self.identity.seller_id) {
            Ok(upload) => {
                self.analysis = None;
                self.analysis_loading = true;
                self.show_explanation = false;
                self.detail = None;
                self.view = SellerView::Analysis;
                tasks::spawn_upload(ctx.client, ctx.tx, upload);
            }
            Err(message) => ctx.show_error(message),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, ctx: &mut Ctx, status: ProductStatus) {
        let list = match status {
            ProductStatus::Accepted => &self.accepted,
            ProductStatus::Rejected => &self.rejected,
        };
        let len = list.len();
        let selected_id = self
            .list_state
            .selected_idx
            .and_then(|idx| list.get(idx))
            .map(|product| product.product_id);
        match key.code {
            KeyCode::Up => {
                self.list_state.move_up_wrap(len);
                self.list_state.ensure_visible(len, LIST_ROWS);
            }
            KeyCode::Down => {
                self.list_state.move_down_wrap(len);
                self.list_state.ensure_visible(len, LIST_ROWS);
            }
            KeyCode::Enter => {
                if let Some(product_id) = selected_id {
                    tasks::spawn_seller_product(ctx.client, ctx.tx, product_id);
                }
            }
            KeyCode::Delete | KeyCode::Char('x') => {
                if let Some(product_id) = selected_id {
                    ctx.confirm(
                        "Are you sure you want to permanently delete this product? \
                         This action cannot be undone.",
                        PendingAction::DeleteProduct { product_id, status },
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_analysis_key(&mut self, key: KeyEvent, ctx: &mut Ctx) {
        if self.analysis_loading {
            return;
        }
        match key.code {
            KeyCode::Char('e') => self.show_explanation = !self.show_explanation,
            KeyCode::Esc => self.change_view(SellerView::Upload, ctx),
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, ctx: &mut Ctx) {
        if self.detail_edit.is_some() {
            if key.code == KeyCode::Esc {
                self.detail_edit = None;
                return;
            }
            if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.save_product_edit(ctx);
                return;
            }
            if let Some(edit) = &mut self.detail_edit {
                match key.code {
                    KeyCode::Tab | KeyCode::Down => edit.focus = cycle_focus(edit.focus, 5, true),
                    KeyCode::BackTab | KeyCode::Up => {
                        edit.focus = cycle_focus(edit.focus, 5, false);
                    }
                    _ => {
                        let focus = edit.focus;
                        edit.fields_mut()[focus].handle_key(key);
                    }
                }
            }
            return;
        }
        match key.code {
            KeyCode::Char('e') => {
                if let Some(detail) = &self.detail {
                    self.detail_edit = Some(ProductEditForm::from_detail(detail));
                }
            }
            KeyCode::Char('v') => self.show_explanation = !self.show_explanation,
            KeyCode::Esc => self.change_view(SellerView::Overview, ctx),
            _ => {}
        }
    }

    fn handle_account_key(&mut self, key: KeyEvent, ctx: &mut Ctx) {
        if self.account_edit.is_some() {
            if key.code == KeyCode::Esc {
                self.account_edit = None;
                return;
            }
            if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.save_account_edit(ctx);
                return;
            }
            if let Some(edit) = &mut self.account_edit {
                match key.code {
                    KeyCode::Tab | KeyCode::Down => edit.focus = cycle_focus(edit.focus, 4, true),
                    KeyCode::BackTab | KeyCode::Up => {
                        edit.focus = cycle_focus(edit.focus, 4, false);
                    }
                    _ => {
                        let focus = edit.focus;
                        edit.fields_mut()[focus].handle_key(key);
                    }
                }
            }
            return;
        }
        match key.code {
            KeyCode::Char('e') => {
                if let Some(account) = &self.account {
                    self.account_edit = Some(AccountEditForm::from_account(account));
                }
            }
            KeyCode::Delete | KeyCode::Char('x') => ctx.confirm(
                "Are you sure you want to delete your account? This action cannot be \
                 undone and all your products will be deleted.",
                PendingAction::DeleteAccount,
            ),
            KeyCode::Esc => self.change_view(SellerView::Overview, ctx),
            _ => {}
        }
    }

    fn save_product_edit(&mut self, ctx: &mut Ctx) {
        let Some(detail) = &self.detail else {
            return;
        };
        let Some(edit) = &self.detail_edit else {
            return;
        };
        match edit.to_update() {
            Ok(update) => {
                tasks::spawn_update_product(ctx.client, ctx.tx, detail.product_id, update);
            }
            Err(message) => ctx.show_error(message),
        }
    }

    fn save_account_edit(&mut self, ctx: &mut Ctx) {
        let Some(edit) = &self.account_edit else {
            return;
        };
        match edit.to_update() {
            Ok(update) => {
                tasks::spawn_update_account(ctx.client, ctx.tx, self.identity.seller_id, update);
            }
            Err(message) => ctx.show_error(message),
        }
    }

    pub fn on_event(&mut self, event: AppEvent, ctx: &mut Ctx) {
        match event {
            AppEvent::CountsLoaded(Ok(counts)) => self.counts = counts,
            AppEvent::CountsLoaded(Err(err)) => {
                tracing::error!("failed to fetch product counts: {err}");
            }
            AppEvent::AcceptedLoaded(result) => {
                self.loading_products = false;
                match result {
                    Ok(products) => {
                        self.accepted = products;
                        self.list_state.clamp_selection(self.accepted.len());
                    }
                    Err(err) => {
                        tracing::error!("failed to fetch accepted products: {err}");
                        self.accepted.clear();
                    }
                }
            }
            AppEvent::RejectedLoaded(result) => {
                self.loading_products = false;
                match result {
                    Ok(products) => {
                        self.rejected = products;
                        self.list_state.clamp_selection(self.rejected.len());
                    }
                    Err(err) => {
                        tracing::error!("failed to fetch rejected products: {err}");
                        self.rejected.clear();
                    }
                }
            }
            AppEvent::SellerProductLoaded(Ok(detail)) => {
                self.detail = Some(detail);
                self.detail_edit = None;
                self.show_explanation = false;
                self.view = SellerView::ProductDetail;
            }
            AppEvent::SellerProductLoaded(Err(err)) => {
                tracing::error!("failed to fetch product details: {err}");
                ctx.show_error("Could not load product details. Please try again.");
            }
            AppEvent::ProductSaved(Ok(())) => {
                if let (Some(detail), Some(edit)) = (&mut self.detail, &self.detail_edit) {
                    detail.product_name = edit.product_name.value().trim().to_string();
                    detail.brand_name = edit.brand_name.value().trim().to_string();
                    detail.product_type = edit.product_type.value().trim().to_string();
                    detail.description = edit.description.value().trim().to_string();
                    if let Ok(price) = edit.price.value().trim().parse() {
                        detail.price = price;
                    }
                }
                self.detail_edit = None;
                ctx.show_info("Saved", "Product details updated successfully!");
            }
            AppEvent::ProductSaved(Err(err)) => ctx.show_error(format!("Error: {err}")),
            AppEvent::ProductDeleted { status, result } => match result {
                Ok(()) => {
                    ctx.show_info("Deleted", "Product deleted successfully.");
                    self.loading_products = true;
                    match status {
                        ProductStatus::Accepted => {
                            tasks::spawn_accepted(ctx.client, ctx.tx, self.identity.seller_id);
                        }
                        ProductStatus::Rejected => {
                            tasks::spawn_rejected(ctx.client, ctx.tx, self.identity.seller_id);
                        }
                    }
                }
                Err(err) => ctx.show_error(format!("Error: {err}")),
            },
            AppEvent::AccountLoaded(Ok(account)) => self.account = Some(account),
            AppEvent::AccountLoaded(Err(err)) => {
                tracing::error!("failed to fetch account details: {err}");
                ctx.show_error("Failed to load account details. Please try again.");
            }
            AppEvent::AccountSaved(Ok(account)) => {
                self.identity.name = account.name.clone();
                self.identity.email = account.email.clone();
                self.account = Some(account);
                self.account_edit = None;
                ctx.show_info("Saved", "Account details updated successfully!");
            }
            AppEvent::AccountSaved(Err(err)) => ctx.show_error(format!("Error: {err}")),
            AppEvent::OcrCompleted(Ok(text)) => self.upload.ocr.on_extracted(text),
            AppEvent::OcrCompleted(Err(err)) => {
                tracing::error!("ocr extraction failed: {err}");
                self.upload.ocr.on_extract_failed();
                ctx.show_error(
                    "Failed to extract text. Please ensure the OCR service is running and try \
                     another image.",
                );
            }
            AppEvent::UploadCompleted(Ok(report)) => {
                self.analysis_loading = false;
                self.analysis = Some(report);
                // The staged images were consumed by this submission.
                self.upload.images.clear();
                tasks::spawn_counts(ctx.client, ctx.tx, self.identity.seller_id);
            }
            AppEvent::UploadCompleted(Err(err)) => {
                self.analysis_loading = false;
                self.view = SellerView::Upload;
                ctx.show_error(format!("Error: {err}"));
            }
            other => tracing::debug!("seller dashboard ignoring event: {other:?}"),
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let [header_area, content_area, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new(self.header_lines()), header_area);
        match self.view {
            SellerView::Overview => self.render_overview(frame, content_area),
            SellerView::Upload => self.render_upload(frame, content_area),
            SellerView::Accepted => {
                self.render_list(frame, content_area, &self.accepted, "Accepted Products")
            }
            SellerView::Rejected => {
                self.render_list(frame, content_area, &self.rejected, "Rejected Products")
            }
            SellerView::Analysis => self.render_analysis(frame, content_area),
            SellerView::ProductDetail => self.render_detail(frame, content_area),
            SellerView::AccountDetails => self.render_account(frame, content_area),
        }
        frame.render_widget(Line::from(self.footer_hint().dim()), footer_area);
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let tab = |label: &'static str, view: SellerView| -> Span<'static> {
            if self.view == view
                || (view == SellerView::Upload && self.view == SellerView::Analysis)
            {
                format!(" {label} ").bold().reversed()
            } else {
                format!(" {label} ").into()
            }
        };
        let mut spans: Vec<Span<'static>> = vec!["dermascan".bold().fg(ACCENT), " seller ".dim()];
        spans.push(tab("Overview", SellerView::Overview));
        spans.push(tab("Upload", SellerView::Upload));
        spans.push(tab("Accepted", SellerView::Accepted));
        spans.push(tab("Rejected", SellerView::Rejected));
        spans.push(tab("Account", SellerView::AccountDetails));
        spans.push("  ".into());
        spans.push(format!("{} <{}>", self.identity.name, self.identity.email).dim());
        vec![Line::from(spans), Line::default()]
    }

    fn footer_hint(&self) -> &'static str {
        match self.view {
            SellerView::Overview => {
                "^O overview · ^U upload · ^A accepted · ^R rejected · ^D account · ^L log out"
            }
            SellerView::Upload => {
                "Tab fields · Enter add/pick · Shift+↑↓ reorder images · ^E extract · ^S submit"
            }
            SellerView::Accepted | SellerView::Rejected => {
                "↑↓ select · Enter details · x delete · ^O overview"
            }
            SellerView::Analysis => "e explanation · Esc back to upload",
            SellerView::ProductDetail => {
                "e edit · v explanation · Esc back · (editing: ^S save, Esc cancel)"
            }
            SellerView::AccountDetails => "e edit · x delete account · Esc back · ^S save",
        }
    }

    fn render_overview(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from("Welcome, Seller!".bold()),
            Line::from("This is your central hub to manage your products.".dim()),
            Line::default(),
            metric_line("Total Products", self.counts.total_products),
            metric_line("Approved Products", self.counts.accepted_products),
            metric_line("Rejected Products", self.counts.rejected_products),
        ];
        frame.render_widget(Paragraph::new(lines), area.inner(Margin::new(2, 1)));
    }

    fn render_upload(&self, frame: &mut Frame, area: Rect) {
        let focus = self.upload.focus();
        let mut lines = vec![
            Line::from("Upload New Skincare Product".bold()),
            Line::default(),
            self.upload.product_name.display_line(focus == UploadFocus::Name),
            Line::default(),
            Line::from("Product images (first is the primary image)".dim()),
            self.upload.image_path.display_line(focus == UploadFocus::ImagePath),
        ];
        if self.upload.images.is_empty() {
            lines.push(Line::from("  no images staged yet".dim()));
        } else {
            for (idx, item) in self.upload.images.items().iter().enumerate() {
                let selected = focus == UploadFocus::ImageList
                    && self.upload.images.state.selected_idx == Some(idx);
                let text = format!("  {} {}", if idx == 0 { "★" } else { "•" }, item.label);
                lines.push(if selected {
                    Line::from(text).reversed()
                } else {
                    Line::from(text)
                });
            }
        }
        lines.push(Line::default());
        lines.push(Line::from("Ingredient list extraction".dim()));
        lines.push(self.upload.ocr.path.display_line(focus == UploadFocus::OcrPath));
        lines.push(match self.upload.ocr.picked_name() {
            Some(name) if self.upload.ocr.processing => {
                Line::from(format!("  {name} — extracting…").italic())
            }
            Some(name) => Line::from(format!("  {name} — ready (^E extract, ^X clear)").dim()),
            None => Line::from("  no photo picked".dim()),
        });
        lines.push(
            self.upload
                .ocr
                .ingredients
                .display_line(focus == UploadFocus::Ingredients),
        );
        lines.push(Line::default());
        lines.push(
            self.upload
                .product_type
                .display_line(focus == UploadFocus::ProductType),
        );
        lines.push(self.upload.brand_name.display_line(focus == UploadFocus::BrandName));
        lines.push(
            self.upload
                .skin_type
                .display_line("Recommended Skin Type", focus == UploadFocus::SkinType),
        );
        lines.push(self.upload.description.display_line(focus == UploadFocus::Description));
        lines.push(self.upload.price.display_line(focus == UploadFocus::Price));
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            area.inner(Margin::new(2, 1)),
        );
    }

    fn render_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        products: &[SellerProductSummary],
        title: &'static str,
    ) {
        let mut lines = vec![
            Line::from(title.bold()),
            Line::from("Click through a product for its full details.".dim()),
            Line::default(),
        ];
        if self.loading_products {
            lines.push(Line::from("Loading…".dim()));
        } else if products.is_empty() {
            lines.push(Line::from("No products found.".dim()));
        } else {
            let top = self.list_state.scroll_top;
            for (idx, product) in products.iter().enumerate().skip(top).take(LIST_ROWS) {
                let selected = self.list_state.selected_idx == Some(idx);
                let text = format!(
                    "{} — ₹{}",
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
        frame.render_widget(
            Paragraph::new(lines),
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
                None => vec![Line::from("No analysis data available.".dim())],
            }
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let inner = area.inner(Margin::new(2, 1));
        let Some(detail) = &self.detail else {
            frame.render_widget(Paragraph::new("Loading product details…".dim()), inner);
            return;
        };
        let mut lines: Vec<Line<'static>> = Vec::new();
        if let Some(edit) = &self.detail_edit {
            lines.push(Line::from("Edit Product Details".bold()));
            lines.push(Line::default());
            lines.push(edit.product_name.display_line(edit.focus == 0));
            lines.push(edit.brand_name.display_line(edit.focus == 1));
            lines.push(edit.product_type.display_line(edit.focus == 2));
            lines.push(edit.price.display_line(edit.focus == 3));
            lines.push(edit.description.display_line(edit.focus == 4));
        } else {
            lines.push(Line::from("Product Details".bold()));
            lines.push(Line::default());
            lines.push(detail_line("Product Name", detail.product_name.clone()));
            lines.push(detail_line("Brand", detail.brand_name.clone()));
            lines.push(detail_line("Type", detail.product_type.clone()));
            lines.push(detail_line("Price", format!("₹{}", format_price(detail.price))));
            if let Some(skin_type) = &detail.skin_type {
                lines.push(detail_line("For Skin Type", skin_type.clone()));
            }
            lines.push(detail_line("Description", detail.description.clone()));
            lines.push(Line::default());
            lines.extend(report_lines(&detail.analysis, self.show_explanation, inner.width));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_account(&self, frame: &mut Frame, area: Rect) {
        let inner = area.inner(Margin::new(2, 1));
        let Some(account) = &self.account else {
            frame.render_widget(Paragraph::new("Loading account details…".dim()), inner);
            return;
        };
        let mut lines = vec![Line::from("Your Account Details".bold()), Line::default()];
        if let Some(edit) = &self.account_edit {
            lines.push(edit.name.display_line(edit.focus == 0));
            lines.push(edit.email.display_line(edit.focus == 1));
            lines.push(edit.business_license_id.display_line(edit.focus == 2));
            lines.push(edit.seller_phno.display_line(edit.focus == 3));
        } else {
            lines.push(detail_line("Name", account.name.clone()));
            lines.push(detail_line("Email", account.email.clone()));
            lines.push(detail_line(
                "Business License ID",
                account.business_license_id.clone(),
            ));
            lines.push(detail_line("Phone Number", account.seller_phno.clone()));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn metric_line(label: &'static str, value: u32) -> Line<'static> {
    Line::from(vec![
        format!("{label}: ").into(),
        value.to_string().bold().fg(ACCENT),
    ])
}

fn detail_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![format!("{label}: ").dim(), value.into()])
}

/// Render a price without a trailing `.0` for whole amounts.
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

    fn filled_form() -> UploadForm {
        let mut form = UploadForm::new();
        form.product_name.set_value("Calm Serum");
        form.description.set_value("Soothing serum");
        form.price.set_value("499");
        form.product_type.set_value("serum");
        form.brand_name.set_value("Derma");
        while form.skin_type.value() != Some(SkinType::Sensitive) {
            form.skin_type.handle_key(crossterm::event::KeyEvent::new(
                KeyCode::Right,
                KeyModifiers::NONE,
            ));
        }
        form.ocr.ingredients.set_value("aqua, glycerin");
        form.images.push_raw("front.jpg");
        form
    }

    #[test]
    fn entering_a_view_declares_exactly_one_fetch() {
        assert_eq!(fetch_for_view(SellerView::Overview), Some(ViewFetch::Counts));
        assert_eq!(
            fetch_for_view(SellerView::AccountDetails),
            Some(ViewFetch::Account)
        );
        assert_eq!(fetch_for_view(SellerView::Accepted), Some(ViewFetch::Accepted));
        assert_eq!(fetch_for_view(SellerView::Rejected), Some(ViewFetch::Rejected));
        assert_eq!(fetch_for_view(SellerView::Upload), None);
        assert_eq!(fetch_for_view(SellerView::Analysis), None);
        assert_eq!(fetch_for_view(SellerView::ProductDetail), None);
    }

    #[test]
    fn empty_description_blocks_submission_and_names_the_field() {
        let mut form = filled_form();
        form.description.set_value("  ");
        let err = build_upload(&form, 1).expect_err("must be blocked");
        assert!(err.contains("Product Description"), "{err}");
        assert!(err.starts_with("Please fill out the following required fields:"));
    }

    #[test]
    fn upload_without_images_is_blocked_first() {
        let mut form = filled_form();
        form.images.clear();
        let err = build_upload(&form, 1).expect_err("must be blocked");
        assert_eq!(err, "Please add at least one product image.");
    }

    #[test]
    fn upload_without_ingredients_is_blocked() {
        let mut form = filled_form();
        form.ocr.ingredients.clear();
        let err = build_upload(&form, 1).expect_err("must be blocked");
        assert!(err.contains("ingredients"), "{err}");
    }

    #[test]
    fn non_numeric_price_is_blocked() {
        let mut form = filled_form();
        form.price.set_value("cheap");
        let err = build_upload(&form, 1).expect_err("must be blocked");
        assert_eq!(err, "Price must be a number.");
    }

    #[test]
    fn valid_form_builds_the_full_payload() {
        let form = filled_form();
        let upload = build_upload(&form, 42).expect("valid form");
        assert_eq!(upload.seller_id, 42);
        assert_eq!(upload.product_name, "Calm Serum");
        assert_eq!(upload.skin_type, SkinType::Sensitive);
        assert_eq!(upload.images.len(), 1);
    }

    #[test]
    fn whole_prices_render_without_decimals() {
        assert_eq!(format_price(499.0), "499");
        assert_eq!(format_price(499.5), "499.50");
    }
}
