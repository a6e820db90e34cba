//! Action dispatch and effect execution.

use std::rc::Rc;

use desktop_wm_contract::{ActivationObserver, SoundEffect, SoundService, WindowActivation};
use leptos::logging;

use crate::catalog::{CatalogError, DesktopCatalog};
use crate::layout::{project_layout, DesktopLayout};
use crate::reducer::{reduce_desktop, DesktopAction, DesktopState, RuntimeEffect};

/// Owns the desktop state and its collaborators.
///
/// Dispatch is transactional: the reducer runs on a copy of the state, and the copy replaces the
/// state only when the action was accepted. Refused actions are logged and leave no trace.
pub struct DesktopRuntime {
    state: DesktopState,
    sound: Option<Rc<dyn SoundService>>,
    observers: Vec<Rc<dyn ActivationObserver>>,
}

impl DesktopRuntime {
    pub fn new(state: DesktopState) -> Self {
        Self {
            state,
            sound: None,
            observers: Vec::new(),
        }
    }

    pub fn from_catalog(catalog: &DesktopCatalog) -> Self {
        Self::new(DesktopState::from_catalog(catalog))
    }

    /// Runtime over the catalog compiled in from `desktop.toml`.
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::from_catalog(&DesktopCatalog::builtin()?))
    }

    pub fn with_sound_service(mut self, sound: Rc<dyn SoundService>) -> Self {
        self.sound = Some(sound);
        self
    }

    pub fn add_activation_observer(&mut self, observer: Rc<dyn ActivationObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &DesktopState {
        &self.state
    }

    pub fn layout(&self) -> DesktopLayout {
        project_layout(&self.state)
    }

    /// Applies `action` and runs its effects.
    ///
    /// Sounds and activation broadcasts are handled here. The returned effects are the ones the
    /// host surface must carry out (pointer subscriptions, input focus, collaborator actions).
    pub fn dispatch(&mut self, action: DesktopAction) -> Vec<RuntimeEffect> {
        let mut next = self.state.clone();
        match reduce_desktop(&mut next, action) {
            Ok(effects) => {
                self.state = next;
                self.execute(effects)
            }
            Err(err) => {
                logging::warn!("desktop reducer error: {err}");
                if let Some(effect) = err.feedback_sound() {
                    self.play(effect);
                }
                Vec::new()
            }
        }
    }

    fn execute(&self, effects: Vec<RuntimeEffect>) -> Vec<RuntimeEffect> {
        let mut host_effects = Vec::new();
        for effect in effects {
            match effect {
                RuntimeEffect::PlaySound(sound) => self.play(sound),
                RuntimeEffect::WindowActivated(window_id) => {
                    let Some(record) = self.state.manager.window(&window_id) else {
                        continue;
                    };
                    let activation = WindowActivation {
                        window_id: record.id.to_string(),
                        title: record.title.clone(),
                        icon_ref: record.icon_ref.clone(),
                        z_index: record.z_index,
                    };
                    for observer in &self.observers {
                        observer.window_activated(&activation);
                    }
                }
                other => host_effects.push(other),
            }
        }
        host_effects
    }

    fn play(&self, effect: SoundEffect) {
        let Some(sound) = &self.sound else {
            return;
        };
        if let Err(err) = sound.play_sound_effect(effect) {
            logging::warn!("sound effect `{}` failed: {err}", effect.token());
        }
    }
}

#[cfg(test)]
mod tests {
    use desktop_wm_contract::{RecordingActivationObserver, RecordingSoundService};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::tests::test_catalog;
    use crate::model::{PointerPosition, WindowId};
    use crate::reducer::PointerTarget;

    struct BrokenSpeaker;

    impl SoundService for BrokenSpeaker {
        fn play_sound_effect(&self, _effect: SoundEffect) -> Result<(), String> {
            Err("audio context suspended".to_string())
        }
    }

    fn open(window: &str) -> DesktopAction {
        DesktopAction::OpenWindow {
            window_id: WindowId::from(window),
        }
    }

    #[test]
    fn refused_action_leaves_state_untouched() {
        let mut runtime = DesktopRuntime::from_catalog(&test_catalog());
        runtime.dispatch(open("a-window"));
        let before = runtime.state().clone();

        let effects = runtime.dispatch(DesktopAction::ChooseWindowMenuItem {
            command: crate::window_menu::WindowMenuCommand::Close,
        });

        assert!(effects.is_empty());
        assert_eq!(runtime.state(), &before);
    }

    #[test]
    fn sounds_and_activations_reach_collaborators() {
        let sound = Rc::new(RecordingSoundService::default());
        let observer = Rc::new(RecordingActivationObserver::default());
        let mut runtime =
            DesktopRuntime::from_catalog(&test_catalog()).with_sound_service(sound.clone());
        runtime.add_activation_observer(observer.clone());

        let host = runtime.dispatch(open("a-window"));
        runtime.dispatch(open("b-window"));
        runtime.dispatch(DesktopAction::CloseWindow {
            window_id: WindowId::from("b-window"),
        });

        assert_eq!(host, vec![RuntimeEffect::FocusWindowInput(WindowId::from("a-window"))]);
        assert_eq!(sound.played(), vec![SoundEffect::Close]);
        assert_eq!(observer.window_ids(), vec!["a-window", "b-window", "a-window"]);
        assert_eq!(observer.last().map(|a| a.z_index), Some(3));
    }

    #[test]
    fn refusal_feedback_plays_error_sound() {
        let sound = Rc::new(RecordingSoundService::default());
        let mut runtime =
            DesktopRuntime::from_catalog(&test_catalog()).with_sound_service(sound.clone());
        runtime.dispatch(open("a-window"));
        runtime.dispatch(DesktopAction::ToggleMaximize {
            window_id: WindowId::from("a-window"),
        });

        let effects = runtime.dispatch(DesktopAction::BeginDrag {
            window_id: WindowId::from("a-window"),
            pointer: PointerPosition { x: 5, y: 5 },
        });

        assert!(effects.is_empty());
        assert_eq!(sound.played(), vec![SoundEffect::Maximize, SoundEffect::Error]);
    }

    #[test]
    fn failing_sound_service_does_not_block_operations() {
        let mut runtime =
            DesktopRuntime::from_catalog(&test_catalog()).with_sound_service(Rc::new(BrokenSpeaker));
        runtime.dispatch(open("a-window"));
        runtime.dispatch(DesktopAction::MinimizeWindow {
            window_id: WindowId::from("a-window"),
        });

        assert_eq!(runtime.state().manager.active_window_id(), None);
    }

    #[test]
    fn pointer_hooks_are_returned_to_host() {
        let mut runtime = DesktopRuntime::from_catalog(&test_catalog());
        runtime.dispatch(open("a-window"));

        let begin = runtime.dispatch(DesktopAction::BeginDrag {
            window_id: WindowId::from("a-window"),
            pointer: PointerPosition { x: 0, y: 0 },
        });
        let end = runtime.dispatch(DesktopAction::PointerUp {
            pointer: PointerPosition { x: 0, y: 0 },
        });

        let target = PointerTarget::Window(WindowId::from("a-window"));
        assert_eq!(begin, vec![RuntimeEffect::SubscribePointer(target.clone())]);
        assert_eq!(end, vec![RuntimeEffect::UnsubscribePointer(target)]);
    }
}
