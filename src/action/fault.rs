use std::any::Any;
use std::fmt;

/// A task of an action which panicked rather than completing.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct TaskFault {
    task: usize,
    message: String
}

impl TaskFault {
    pub(crate) fn new(task: usize, message: &str) -> TaskFault {
        TaskFault { task, message: message.to_string() }
    }

    pub(crate) fn from_panic(task: usize, payload: &(dyn Any + Send)) -> TaskFault {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        TaskFault::new(task,&message)
    }

    /// Index of the task within its action.
    pub fn task(&self) -> usize { self.task }
    pub fn message(&self) -> &str { &self.message }
}

impl fmt::Display for TaskFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"task {} panicked: {}",self.task,self.message)
    }
}

/// A task fault collected by a queue, labelled with the action it came from.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct ActionFault {
    action: String,
    identity: u64,
    fault: TaskFault
}

impl ActionFault {
    pub(crate) fn new(action: &str, identity: u64, fault: TaskFault) -> ActionFault {
        ActionFault { action: action.to_string(), identity, fault }
    }

    pub fn action(&self) -> &str { &self.action }
    pub fn identity(&self) -> u64 { self.identity }
    pub fn fault(&self) -> &TaskFault { &self.fault }
}

impl fmt::Display for ActionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}: {}",self.action,self.fault)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_panic_messages() {
        let a: Box<dyn Any + Send> = Box::new("static");
        let b: Box<dyn Any + Send> = Box::new(format!("owned {}",1));
        let c: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!("static",TaskFault::from_panic(0,a.as_ref()).message());
        assert_eq!("owned 1",TaskFault::from_panic(1,b.as_ref()).message());
        assert_eq!("non-string panic payload",TaskFault::from_panic(2,c.as_ref()).message());
        let fault = ActionFault::new("swap",7,TaskFault::new(1,"bad index"));
        assert_eq!("swap: task 1 panicked: bad index",fault.to_string());
        assert_eq!(1,fault.fault().task());
    }
}
