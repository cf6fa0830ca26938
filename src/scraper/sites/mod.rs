// One adapter per retailer

pub mod amazon;
pub mod americanas;
pub mod estante_virtual;
pub mod mercado_livre;
pub mod travessa;

pub use amazon::AmazonAdapter;
pub use americanas::AmericanasAdapter;
pub use estante_virtual::EstanteVirtualAdapter;
pub use mercado_livre::MercadoLivreAdapter;
pub use travessa::TravessaAdapter;
