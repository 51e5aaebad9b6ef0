use crate::behavior::bt::*;

type ActionCallback<T> = fn(&mut T) -> TickResult;

pub struct BTAction<T> {
    name: &'static str,
    callback: ActionCallback<T>,
    decorators: Vec<BoxedDecorator<T>>,
}

impl<T> BTAction<T> {
    pub fn new(name: &'static str, callback: ActionCallback<T>) -> BTAction<T> {
        BTAction {
            name,
            decorators: Vec::<BoxedDecorator<T>>::new(),
            callback,
        }
    }

    pub fn with_decorator(mut self, decorator: BoxedDecorator<T>) -> BTAction<T> {
        self.decorators.push(decorator);
        self
    }

    pub fn guarded<F>(self, predicate: F) -> BTAction<T>
    where
        F: Fn(&T) -> Result<bool, DecisionError> + Send + Sync + 'static,
        T: 'static,
    {
        self.with_decorator(BTGuard::new(predicate))
    }

    pub fn boxed(self) -> BoxedNode<T>
    where
        T: 'static,
    {
        Box::new(self)
    }
}

impl<T> BTNode<T> for BTAction<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reset(&mut self) {}

    fn get_decorators(&self) -> Iter<'_, BoxedDecorator<T>> {
        self.decorators.iter()
    }

    fn internal_tick(&mut self, blackboard: &mut T) -> TickResult {
        (self.callback)(blackboard)
    }
}
