pub mod authors;
pub mod books;
pub mod publishers;

use folio_kernel::ModuleRegistry;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(authors::create_module());
    registry.register(books::create_module());
    registry.register(publishers::create_module());
}
