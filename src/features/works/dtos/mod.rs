mod work_dto;

pub use work_dto::{
    AdminListQuery, CreateWorkDto, ListWorksQuery, UpdateWorkDto, WorkResponseDto,
    WorkSummaryDto, WorkViewDto,
};
