pub mod invoice;
pub mod pagination;
pub mod supplier;
pub mod user;

pub use invoice::{
    CreateInvoice, Invoice, InvoiceFilter, InvoiceSortDir, InvoiceSortKey, InvoiceStatus,
    InvoiceType, InvoiceWithSupplier, UpdateInvoice,
};
pub use pagination::{Paginated, PaginationMeta};
pub use supplier::{CreateSupplier, Supplier, UpdateSupplier};
pub use user::{User, UserResponse};
