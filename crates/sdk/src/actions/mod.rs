//! Concrete API actions, grouped by resource.

mod eip;

pub use eip::{
    AttachEipAction, AttachEipResult, GetEipAttachableVmNicsAction, GetEipAttachableVmNicsResult,
};
