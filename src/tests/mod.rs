mod modifier;
mod properties;
