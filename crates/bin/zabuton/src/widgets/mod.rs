//! reusable egui widgets: every widget owns its state and reports user
//! input as events that the page consumes in `handle_user_interactions`

pub mod dropdown;
pub mod editor;
pub mod events;
pub mod modal;
pub mod switch;
pub mod toast;

pub use dropdown::{display_one_dropdown, DropDown, DropDownItem};
pub use editor::{Editor, EditorEvent, RestoreEditor};
pub use events::EventQueue;
pub use modal::{
    CreatePasswordModal, InfoModal, ListPreferenceModal, ModalAction, NewPassword, PasswordModal,
    TextInputModal,
};
pub use switch::Switch;
pub use toast::Toast;
