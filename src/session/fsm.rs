use rust_fsm::*;

state_machine! {
    chat_flow(Idle)

    Idle(HydrateAwaitingKey) => AwaitingKey,
    Idle(HydrateSending) => Sending,

    Idle(SubmitWithoutKey) => AwaitingKey,
    Idle(OpenKeyPrompt) => AwaitingKey,
    Idle(Submit) => Sending,

    AwaitingKey(SubmitWithoutKey) => AwaitingKey,
    AwaitingKey(OpenKeyPrompt) => AwaitingKey,
    AwaitingKey(KeyAccepted) => Idle,
    AwaitingKey(CancelKeyPrompt) => Idle,

    Sending(Settle) => Idle
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingKey,
    Sending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    SubmitWithoutKey,
    OpenKeyPrompt,
    Submit,
    KeyAccepted,
    CancelKeyPrompt,
    Settle,
}

fn hydrate(machine: &mut chat_flow::StateMachine, state: SessionState) -> Result<(), ()> {
    let input = match state {
        SessionState::Idle => return Ok(()),
        SessionState::AwaitingKey => chat_flow::Input::HydrateAwaitingKey,
        SessionState::Sending => chat_flow::Input::HydrateSending,
    };
    machine.consume(&input).map_err(|_| ())?;
    Ok(())
}

fn expected_next_state(current: SessionState, event: SessionEvent) -> Option<SessionState> {
    match (current, event) {
        (SessionState::Idle, SessionEvent::SubmitWithoutKey) => Some(SessionState::AwaitingKey),
        (SessionState::Idle, SessionEvent::OpenKeyPrompt) => Some(SessionState::AwaitingKey),
        (SessionState::Idle, SessionEvent::Submit) => Some(SessionState::Sending),
        (SessionState::AwaitingKey, SessionEvent::SubmitWithoutKey) => {
            Some(SessionState::AwaitingKey)
        }
        (SessionState::AwaitingKey, SessionEvent::OpenKeyPrompt) => Some(SessionState::AwaitingKey),
        (SessionState::AwaitingKey, SessionEvent::KeyAccepted) => Some(SessionState::Idle),
        (SessionState::AwaitingKey, SessionEvent::CancelKeyPrompt) => Some(SessionState::Idle),
        (SessionState::Sending, SessionEvent::Settle) => Some(SessionState::Idle),
        _ => None,
    }
}

pub fn transition(current: SessionState, event: SessionEvent) -> Option<SessionState> {
    let mut machine = chat_flow::StateMachine::new();
    hydrate(&mut machine, current).ok()?;

    let input = match event {
        SessionEvent::SubmitWithoutKey => chat_flow::Input::SubmitWithoutKey,
        SessionEvent::OpenKeyPrompt => chat_flow::Input::OpenKeyPrompt,
        SessionEvent::Submit => chat_flow::Input::Submit,
        SessionEvent::KeyAccepted => chat_flow::Input::KeyAccepted,
        SessionEvent::CancelKeyPrompt => chat_flow::Input::CancelKeyPrompt,
        SessionEvent::Settle => chat_flow::Input::Settle,
    };

    machine.consume(&input).ok()?;
    expected_next_state(current, event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_and_settle_round_trip_to_idle() {
        assert_eq!(
            transition(SessionState::Idle, SessionEvent::Submit),
            Some(SessionState::Sending)
        );
        assert_eq!(
            transition(SessionState::Sending, SessionEvent::Settle),
            Some(SessionState::Idle)
        );
    }

    #[test]
    fn key_prompt_flow() {
        assert_eq!(
            transition(SessionState::Idle, SessionEvent::SubmitWithoutKey),
            Some(SessionState::AwaitingKey)
        );
        assert_eq!(
            transition(SessionState::AwaitingKey, SessionEvent::KeyAccepted),
            Some(SessionState::Idle)
        );
    }

    #[test]
    fn sending_rejects_everything_but_settle() {
        for event in [
            SessionEvent::Submit,
            SessionEvent::SubmitWithoutKey,
            SessionEvent::OpenKeyPrompt,
            SessionEvent::KeyAccepted,
        ] {
            assert_eq!(transition(SessionState::Sending, event), None);
        }
        assert_eq!(transition(SessionState::Idle, SessionEvent::Settle), None);
    }
}
