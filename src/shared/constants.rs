use std::time::Duration;

/// Default page size for catalog reads
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Image store folder for category images
pub const CATEGORY_IMAGE_FOLDER: &str = "LIPCI/categories";

/// Quiet period before a search term is sent to the server
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long a contact form alert stays visible
pub const ALERT_DISMISS_AFTER: Duration = Duration::from_secs(5);

// =============================================================================
// STOREFRONT ROUTES
// =============================================================================

/// Full search results page of the storefront
pub const RESULTS_PAGE_PATH: &str = "/product-catalog/results";

/// Product detail page of the storefront, followed by `/{code}`
pub const PRODUCT_DETAILS_PATH: &str = "/product-catalog/details";

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub mod messages {
    pub const ALL_FIELDS_REQUIRED: &str = "Всички полета са задължителни!";
    pub const CATEGORY_IMAGE_REQUIRED: &str = "Трябва да качите изображение на категорията!";
    pub const CATEGORY_NAME_TAKEN: &str = "Категория с това име вече съществува!";
    pub const CATEGORY_CODE_TAKEN: &str = "Категория с този код вече съществува!";
    pub const CATEGORY_CREATED: &str = "Категорията е добавена успешно!";
    pub const CATEGORIES_FETCH_FAILED: &str =
        "Възникна грешка при извличане на данните на категориите!";

    pub const INVALID_EMAIL: &str = "Невалиден имейл адрес!";
    pub const MESSAGE_SENT: &str = "Съобщението е изпратено успешно!";
    pub const MESSAGES_FETCH_FAILED: &str =
        "Възникна грешка при извличане на съобщенията!";

    pub const PRODUCT_NOT_FOUND: &str = "Продуктът не е намерен!";
    pub const PRODUCTS_FETCH_FAILED: &str = "Възникна грешка при извличане на продуктите!";

    pub const INVALID_REQUEST_BODY: &str = "Невалидни данни в заявката!";
    pub const INVALID_QUERY_PARAMS: &str = "Невалидни параметри на заявката!";
    pub const GENERIC_FAILURE: &str = "Възникна грешка! Моля, опитайте отново!";

    /// Shown by clients when the request itself could not be completed
    pub const REQUEST_PROCESSING_FAILED: &str = "Възникна грешка при обработка на заявката!";
}
