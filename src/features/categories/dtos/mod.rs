mod category_dto;

pub use category_dto::{CategoryListDto, CategoryNamesDto, CategoryResponseDto};
