mod category_dto;

pub use category_dto::{CategoryCreatedDto, CategoryDraft, CategoryResponseDto, CreateCategoryDto};
