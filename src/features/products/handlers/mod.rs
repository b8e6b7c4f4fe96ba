mod product_handler;

pub use product_handler::{__path_get_product, __path_search_products, get_product, search_products};
