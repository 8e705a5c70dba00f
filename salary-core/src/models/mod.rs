mod insurance_mode;
mod policy_set;
mod region;
mod tax_bracket;
mod tax_input;
mod tax_policy;
mod tax_result;

pub use insurance_mode::InsuranceMode;
pub use policy_set::PolicySet;
pub use region::Region;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
pub use tax_input::TaxInput;
pub use tax_policy::{PolicyDefinition, PolicyError, RegionalMinSalary, TaxPolicy};
pub use tax_result::TaxResult;
